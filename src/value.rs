use crate::context::{Context, Mapping};
use gtmpl_value::Value;
use std::collections::HashMap;

/// Field name under which templates see the rendered markdown.
pub const MARKDOWN_FIELD: &str = "md";

/// Field name under which templates see the raw partials.
pub const PARTIALS_FIELD: &str = "partials";

// Mappings become objects rather than maps, so `index` on a missing name is an
// execution error instead of an empty string.
impl From<&Mapping> for Value {
    fn from(mapping: &Mapping) -> Value {
        let m: HashMap<String, Value> = mapping
            .iter()
            .map(|(name, text)| (name.to_owned(), Value::String(text.to_owned())))
            .collect();
        Value::Object(m)
    }
}

impl From<&Context> for Value {
    fn from(ctx: &Context) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(MARKDOWN_FIELD.to_owned(), (&ctx.md).into());
        m.insert(PARTIALS_FIELD.to_owned(), (&ctx.partials).into());
        Value::Object(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_to_value() {
        let mut md = Mapping::default();
        md.insert("a.md", String::from("<p>a</p>\n"));
        let mut partials = Mapping::default();
        partials.insert("footer.html", String::from("<footer></footer>"));

        let value = Value::from(&Context::new(md, partials));
        assert_eq!(Some("<p>a</p>\n"), field(&value, MARKDOWN_FIELD, "a.md"));
        assert_eq!(
            Some("<footer></footer>"),
            field(&value, PARTIALS_FIELD, "footer.html")
        );
        assert_eq!(None, field(&value, PARTIALS_FIELD, "header.html"));
    }

    fn field<'a>(value: &'a Value, binding: &str, name: &str) -> Option<&'a str> {
        let object = match value {
            Value::Object(fields) => fields.get(binding)?,
            _ => panic!("wanted the context to be an object"),
        };
        match object {
            Value::Object(entries) => match entries.get(name)? {
                Value::String(text) => Some(text.as_str()),
                _ => panic!("wanted '{}' to be a string", name),
            },
            _ => panic!("wanted '{}' to be an object", binding),
        }
    }
}
