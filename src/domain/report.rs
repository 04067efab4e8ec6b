//! Report definitions loaded from the query catalog

/// One exportable dataset: a base query plus an optional customization query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDefinition {
    /// Report name, used in artifact file names
    pub name: String,

    /// Base query text, executed inside the client/organization scope filter
    pub base_query: String,

    /// Whether the report ships with the platform rather than being tenant-authored
    pub is_vendor_base: bool,

    /// Optional customization query, executed unfiltered
    pub custom_query: Option<String>,
}

impl ReportDefinition {
    pub fn new(name: impl Into<String>, base_query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_query: base_query.into(),
            is_vendor_base: false,
            custom_query: None,
        }
    }

    /// Marks the report as vendor-sourced
    pub fn vendor_base(mut self) -> Self {
        self.is_vendor_base = true;
        self
    }

    /// Sets the customization query; blank text counts as absent
    pub fn with_custom_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.custom_query = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
        self
    }

    /// Interprets the stored origin flag: anything but `N` is vendor-sourced
    pub fn vendor_flag(flag: &str) -> bool {
        !flag.trim().eq_ignore_ascii_case("n")
    }
}
