//! Tera filters available to every template

use std::collections::HashMap;
use tera::{try_get_value, Tera, Value};

pub(super) fn register(tera: &mut Tera) {
    tera.register_filter("strip_html", strip_html);
    tera.register_filter("truncate_chars", truncate_chars);
}

/// `{{ preview | strip_html }}`
fn strip_html(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = try_get_value!("strip_html", "value", String, value);
    let mut text = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    Ok(Value::String(text))
}

/// `{{ content | strip_html | truncate_chars(length=140, omission="…") }}`
fn truncate_chars(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        return Ok(Value::String(s));
    }
    let truncated: String = s.chars().take(length).collect();
    Ok(Value::String(format!("{}{}", truncated.trim_end(), omission)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        let out = strip_html(&Value::from("<p>Hi <em>there</em></p>"), &HashMap::new()).unwrap();
        assert_eq!(out, Value::from("Hi there"));
    }

    #[test]
    fn test_truncate_chars() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), Value::from(5));
        let out = truncate_chars(&Value::from("Hello world"), &args).unwrap();
        assert_eq!(out, Value::from("Hello..."));

        let short = truncate_chars(&Value::from("Hi"), &args).unwrap();
        assert_eq!(short, Value::from("Hi"));
    }

    #[test]
    fn test_filters_in_template() {
        let mut tera = Tera::default();
        register(&mut tera);
        let mut ctx = tera::Context::new();
        ctx.insert("v", "<b>abcdef</b>");
        let out = tera
            .render_str(
                "{{ v | strip_html | truncate_chars(length=3, omission='!') }}",
                &ctx,
            )
            .unwrap();
        assert_eq!(out, "abc!");
    }
}
