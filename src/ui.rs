use serde::Serialize;
use serde_json::Value;

/// Serializes a widget into the tree sent to the host.
pub fn node<T: Serialize>(widget: T) -> Value {
    serde_json::to_value(widget).unwrap_or(Value::Null)
}

#[derive(Serialize)]
pub struct Text<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<&'a str>,
}

impl<'a> Text<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            kind: "Text",
            text,
            size: None,
            content_description: None,
        }
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn content_description(mut self, cd: &'a str) -> Self {
        self.content_description = Some(cd);
        self
    }
}

#[derive(Serialize)]
pub struct Button<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<&'a str>,
}

impl<'a> Button<'a> {
    pub fn new(text: &'a str, action: impl Into<String>) -> Self {
        Self {
            kind: "Button",
            text,
            action: action.into(),
            id: None,
            content_description: None,
        }
    }

    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    pub fn content_description(mut self, cd: &'a str) -> Self {
        self.content_description = Some(cd);
        self
    }
}

#[derive(Serialize)]
pub struct Column {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    pub children: Vec<Value>,
}

impl Column {
    pub fn new(children: Vec<Value>) -> Self {
        Self {
            kind: "Column",
            padding: None,
            children,
        }
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = Some(padding);
        self
    }
}

/// Fixed-width button grid; keys fill rows left to right.
#[derive(Serialize)]
pub struct Grid {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub children: Vec<Value>,
    pub columns: u32,
}

impl Grid {
    pub fn new(columns: u32, children: Vec<Value>) -> Self {
        Self {
            kind: "Grid",
            children,
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_serializes_action_and_marker() {
        let val = node(Button::new("+", "calc_op:+").id("key_add").content_description("selected"));
        assert_eq!(val.get("type").and_then(|v| v.as_str()), Some("Button"));
        assert_eq!(val.get("action").and_then(|v| v.as_str()), Some("calc_op:+"));
        assert_eq!(val.get("id").and_then(|v| v.as_str()), Some("key_add"));
        assert_eq!(
            val.get("content_description").and_then(|v| v.as_str()),
            Some("selected")
        );
    }

    #[test]
    fn optional_fields_are_omitted() {
        let val = node(Text::new("0"));
        assert!(val.get("size").is_none());
        assert!(val.get("content_description").is_none());

        let grid = node(Grid::new(4, vec![val]));
        assert_eq!(grid.get("columns").and_then(|v| v.as_u64()), Some(4));
        assert_eq!(grid.get("children").and_then(|v| v.as_array()).map(Vec::len), Some(1));
    }
}
