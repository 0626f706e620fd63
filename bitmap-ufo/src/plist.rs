//! Just enough of the XML property list format to write UFO metadata.

use std::collections::BTreeMap;
use std::fmt::Write;

const HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" ",
    "\"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
    "<plist version=\"1.0\">\n",
);

/// A property list value.
///
/// Dictionaries are sorted by key, so the same value always serializes to
/// the same bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum Plist {
    String(String),
    Integer(i64),
    Array(Vec<Plist>),
    Dict(BTreeMap<String, Plist>),
}

impl Plist {
    /// Serialize as a complete XML plist document.
    pub fn to_xml(&self) -> String {
        let mut out = String::from(HEADER);
        self.write_value(&mut out, 0);
        out.push_str("</plist>\n");
        out
    }

    fn write_value(&self, out: &mut String, depth: usize) {
        let indent = "\t".repeat(depth);
        match self {
            Plist::String(text) => {
                let _ = writeln!(out, "{indent}<string>{}</string>", escape(text));
            }
            Plist::Integer(value) => {
                let _ = writeln!(out, "{indent}<integer>{value}</integer>");
            }
            Plist::Array(items) => {
                let _ = writeln!(out, "{indent}<array>");
                for item in items {
                    item.write_value(out, depth + 1);
                }
                let _ = writeln!(out, "{indent}</array>");
            }
            Plist::Dict(entries) => {
                let _ = writeln!(out, "{indent}<dict>");
                for (key, value) in entries {
                    let _ = writeln!(out, "{indent}\t<key>{}</key>", escape(key));
                    value.write_value(out, depth + 1);
                }
                let _ = writeln!(out, "{indent}</dict>");
            }
        }
    }
}

impl From<&str> for Plist {
    fn from(src: &str) -> Plist {
        Plist::String(src.to_owned())
    }
}

impl From<String> for Plist {
    fn from(src: String) -> Plist {
        Plist::String(src)
    }
}

impl From<i64> for Plist {
    fn from(src: i64) -> Plist {
        Plist::Integer(src)
    }
}

impl<T: Into<Plist>> From<Vec<T>> for Plist {
    fn from(src: Vec<T>) -> Plist {
        Plist::Array(src.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Plist>> FromIterator<(K, V)> for Plist {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Plist::Dict(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dict_keys_are_sorted() {
        let plist: Plist = [("formatVersion", Plist::from(3i64)), ("creator", "me".into())]
            .into_iter()
            .collect();
        assert_eq!(
            plist.to_xml(),
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" ",
                "\"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
                "<plist version=\"1.0\">\n",
                "<dict>\n",
                "\t<key>creator</key>\n",
                "\t<string>me</string>\n",
                "\t<key>formatVersion</key>\n",
                "\t<integer>3</integer>\n",
                "</dict>\n",
                "</plist>\n",
            )
        );
    }

    #[test]
    fn nested_arrays_are_indented() {
        let plist = Plist::from(vec![vec!["public.default", "glyphs"]]);
        let xml = plist.to_xml();
        assert!(xml.contains(
            "<array>\n\t<array>\n\t\t<string>public.default</string>\n\t\t<string>glyphs</string>\n\t</array>\n</array>\n"
        ));
    }

    #[test]
    fn text_is_escaped() {
        let plist: Plist = [("a<b", "x & y")].into_iter().collect();
        let xml = plist.to_xml();
        assert!(xml.contains("<key>a&lt;b</key>"));
        assert!(xml.contains("<string>x &amp; y</string>"));
    }
}
