/// In-memory stand-in for the live page DOM: what the generated script sees
/// in the browser, modeled host-side so the evaluation engine is testable.
/// Mutated only by the engine's action application.
#[derive(Debug, Clone, Default)]
pub struct DomDocument {
    pub fields: Vec<DomField>,
    pub wrappers: Vec<DomWrapper>,
}

#[derive(Debug, Clone)]
pub struct DomField {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub input_type: String,
    pub value: String,
    pub text: String,
    pub checked: bool,
    pub placeholder: String,
    pub data_name: String,
    /// Text of the associated <label>, when one points at this field.
    pub label: Option<String>,
    pub wrapper_id: Option<String>,

    pub visible: bool,
    pub label_visible: bool,
    pub required: bool,
    pub disabled: bool,
    /// Required state saved when the field is hidden, restored exactly on
    /// show.
    pub prior_required: Option<bool>,
}

/// A non-input container usable as a show/hide target.
#[derive(Debug, Clone)]
pub struct DomWrapper {
    pub id: String,
    pub visible: bool,
}

impl DomField {
    pub fn new(id: &str, name: &str, tag: &str, input_type: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tag: tag.to_string(),
            input_type: input_type.to_string(),
            value: String::new(),
            text: String::new(),
            checked: false,
            placeholder: String::new(),
            data_name: String::new(),
            label: None,
            wrapper_id: None,
            visible: true,
            label_visible: true,
            required: false,
            disabled: false,
            prior_required: None,
        }
    }

    pub fn text_input(id: &str, name: &str) -> Self {
        Self::new(id, name, "input", "text")
    }

    pub fn checkbox(id: &str, name: &str) -> Self {
        Self::new(id, name, "input", "checkbox")
    }

    pub fn radio(id: &str, name: &str, value: &str) -> Self {
        let mut f = Self::new(id, name, "input", "radio");
        f.value = value.to_string();
        f
    }

    pub fn select(id: &str, name: &str) -> Self {
        Self::new(id, name, "select", "select")
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_data_name(mut self, data_name: &str) -> Self {
        self.data_name = data_name.to_string();
        self
    }

    pub fn with_wrapper(mut self, wrapper_id: &str) -> Self {
        self.wrapper_id = Some(wrapper_id.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl DomDocument {
    pub fn with_fields(fields: Vec<DomField>) -> Self {
        Self {
            fields,
            wrappers: Vec::new(),
        }
    }

    pub fn add_wrapper(&mut self, id: &str) {
        self.wrappers.push(DomWrapper {
            id: id.to_string(),
            visible: true,
        });
    }

    pub fn field_by_id(&self, id: &str) -> Option<&DomField> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn wrapper_index(&self, id: &str) -> Option<usize> {
        self.wrappers.iter().position(|w| w.id == id)
    }

    /// The checked radio's value within a named group, if any.
    pub fn checked_radio_value(&self, group_name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.input_type == "radio" && f.name == group_name && f.checked)
            .map(|f| f.value.as_str())
    }

    /// Simulate user input on a field (tests and the preview CLI).
    pub fn set_value(&mut self, id: &str, value: &str) {
        if let Some(f) = self.fields.iter_mut().find(|f| f.id == id) {
            f.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) {
        // Radios are exclusive within their group.
        let group = self
            .fields
            .iter()
            .find(|f| f.id == id)
            .filter(|f| f.input_type == "radio")
            .map(|f| f.name.clone());

        if let (Some(name), true) = (&group, checked) {
            for f in self.fields.iter_mut() {
                if f.input_type == "radio" && &f.name == name {
                    f.checked = false;
                }
            }
        }

        if let Some(f) = self.fields.iter_mut().find(|f| f.id == id) {
            f.checked = checked;
        }
    }
}
