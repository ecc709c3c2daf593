#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    /// ISO calendar date, `YYYY-MM-DD`.
    Date,
    Flag,
    /// Free text with a popup of suggested values.
    Lookup,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required(&'static str),
    Min(f64, &'static str),
}

impl Rule {
    pub fn message(&self) -> &'static str {
        match self {
            Rule::Required(message) | Rule::Min(_, message) => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Key of the field in the wire payload.
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub read_only: bool,
    pub width: u16,
    pub rules: &'static [Rule],
}

impl FieldSchema {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            read_only: false,
            width: 24,
            rules: &[],
        }
    }

    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub const fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub const fn rules(mut self, rules: &'static [Rule]) -> Self {
        self.rules = rules;
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule, Rule::Required(_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub key: &'static str,
    pub header: &'static str,
    pub width: u16,
}

impl ColumnSchema {
    pub const fn new(key: &'static str, header: &'static str, width: u16) -> Self {
        Self { key, header, width }
    }
}
