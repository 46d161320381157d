//! Widget schemas - Data-driven property and method tables.
//!
//! Each component type lists the options it accepts and the extension methods
//! it exposes (with their arity). The dispatcher checks options first, then
//! methods, so adding a type is a matter of adding a table entry.

/// What kind of activation a widget performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Nothing besides running `command`, if any.
    Command,
    /// Toggle the bound variable between `onvalue` and `offvalue`.
    Toggle,
    /// Write `value` into the bound variable.
    Select,
}

/// Options and methods of one component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub type_name: &'static str,
    pub options: &'static [&'static str],
    pub methods: &'static [(&'static str, usize)],
    pub activation: Activation,
}

/// Options every type accepts.
pub const COMMON_OPTIONS: &[&str] = &[
    "background", "bg", "borderwidth", "cursor", "height", "highlightthickness",
    "padx", "pady", "relief", "takefocus", "width",
];

/// Methods every type exposes.
pub const COMMON_METHODS: &[(&str, usize)] = &[
    ("cget", 1),
    ("focus_set", 0),
    ("lift", 0),
    ("lower", 0),
];

const TEXT_OPTIONS: &[&str] = &[
    "anchor", "fg", "font", "foreground", "justify", "state", "text", "textvariable",
    "wraplength",
];

impl Schema {
    pub fn has_option(&self, key: &str) -> bool {
        COMMON_OPTIONS.contains(&key) || self.options.contains(&key)
    }

    pub fn arity(&self, method: &str) -> Option<usize> {
        COMMON_METHODS
            .iter()
            .chain(self.methods.iter())
            .find(|(name, _)| *name == method)
            .map(|(_, arity)| *arity)
    }

    /// All accepted options, common ones first.
    pub fn option_names(&self) -> Vec<String> {
        COMMON_OPTIONS
            .iter()
            .chain(self.options.iter())
            .map(|key| key.to_string())
            .collect()
    }
}

pub const TK: Schema = Schema {
    type_name: "Tk",
    options: &["menu"],
    methods: &[
        ("title", 1),
        ("geometry", 1),
        ("minsize", 2),
        ("maxsize", 2),
        ("resizable", 2),
        ("iconname", 1),
    ],
    activation: Activation::Command,
};

pub const TOPLEVEL: Schema = Schema {
    type_name: "Toplevel",
    options: &["menu"],
    methods: &[("title", 1), ("geometry", 1), ("minsize", 2), ("resizable", 2)],
    activation: Activation::Command,
};

pub const FRAME: Schema = Schema {
    type_name: "Frame",
    options: &["class_", "colormap", "container", "visual"],
    methods: &[("columnconfigure", 2), ("rowconfigure", 2)],
    activation: Activation::Command,
};

pub const LABEL_FRAME: Schema = Schema {
    type_name: "LabelFrame",
    options: &["font", "fg", "foreground", "labelanchor", "text"],
    methods: &[("columnconfigure", 2), ("rowconfigure", 2)],
    activation: Activation::Command,
};

pub const LABEL: Schema = Schema {
    type_name: "Label",
    options: TEXT_OPTIONS,
    methods: &[],
    activation: Activation::Command,
};

pub const BUTTON: Schema = Schema {
    type_name: "Button",
    options: &[
        "anchor", "command", "default", "fg", "font", "foreground", "justify", "state",
        "text", "textvariable", "wraplength",
    ],
    methods: &[("flash", 0), ("invoke", 0)],
    activation: Activation::Command,
};

pub const CHECKBUTTON: Schema = Schema {
    type_name: "Checkbutton",
    options: &[
        "anchor", "command", "fg", "font", "foreground", "offvalue", "onvalue", "state",
        "text", "textvariable", "variable",
    ],
    methods: &[("select", 0), ("deselect", 0), ("toggle", 0), ("invoke", 0)],
    activation: Activation::Toggle,
};

pub const RADIOBUTTON: Schema = Schema {
    type_name: "Radiobutton",
    options: &[
        "anchor", "command", "fg", "font", "foreground", "state", "text", "textvariable",
        "value", "variable",
    ],
    methods: &[("select", 0), ("deselect", 0), ("invoke", 0)],
    activation: Activation::Select,
};

pub const ENTRY: Schema = Schema {
    type_name: "Entry",
    options: &[
        "fg", "font", "foreground", "justify", "show", "state", "textvariable",
    ],
    methods: &[("insert", 2), ("delete", 2)],
    activation: Activation::Command,
};

pub const LISTBOX: Schema = Schema {
    type_name: "Listbox",
    options: &["fg", "font", "foreground", "listvariable", "selectmode"],
    methods: &[("insert", 2), ("delete", 2), ("selection_set", 1)],
    activation: Activation::Command,
};

pub const SCALE: Schema = Schema {
    type_name: "Scale",
    options: &[
        "command", "from_", "label", "length", "orient", "resolution", "showvalue", "to",
        "variable",
    ],
    methods: &[("set", 1)],
    activation: Activation::Command,
};

pub const TEXT: Schema = Schema {
    type_name: "Text",
    options: &["fg", "font", "foreground", "state", "wrap"],
    methods: &[("insert", 2), ("delete", 2)],
    activation: Activation::Command,
};

/// Every schema the reference toolkit knows out of the box.
pub const BUILTIN_SCHEMAS: &[Schema] = &[
    TK, TOPLEVEL, FRAME, LABEL_FRAME, LABEL, BUTTON, CHECKBUTTON, RADIOBUTTON, ENTRY,
    LISTBOX, SCALE, TEXT,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_and_specific_options() {
        assert!(LABEL.has_option("text"));
        assert!(LABEL.has_option("width"));
        assert!(!LABEL.has_option("command"));
        assert!(BUTTON.has_option("command"));
    }

    #[test]
    fn test_arity_lookup() {
        assert_eq!(TK.arity("minsize"), Some(2));
        assert_eq!(TK.arity("title"), Some(1));
        assert_eq!(LABEL.arity("cget"), Some(1));
        assert_eq!(LABEL.arity("focus_set"), Some(0));
        assert_eq!(LABEL.arity("title"), None);
    }

    #[test]
    fn test_type_names_are_unique() {
        for (i, a) in BUILTIN_SCHEMAS.iter().enumerate() {
            for b in &BUILTIN_SCHEMAS[i + 1..] {
                assert_ne!(a.type_name, b.type_name);
            }
        }
    }
}
