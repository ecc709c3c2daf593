use crate::{domain::CatalogOption, presentation::PopupRender};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PopupChoice {
    /// Text written into the focused form field.
    Text(String),
    /// Catalog id assigned to the grid row under the cursor.
    Catalog(i64),
}

pub(crate) struct PopupState {
    title: String,
    options: Vec<String>,
    choices: Vec<PopupChoice>,
    selected: usize,
}

impl PopupState {
    /// Lookup values for a form field; preselects the current text.
    pub(crate) fn for_field(title: &str, options: &[String], current: &str) -> Option<Self> {
        if options.is_empty() {
            return None;
        }
        let selected = options
            .iter()
            .position(|option| option == current)
            .unwrap_or(0);
        Some(Self {
            title: title.to_string(),
            options: options.to_vec(),
            choices: options.iter().cloned().map(PopupChoice::Text).collect(),
            selected,
        })
    }

    /// Catalog entries for an item row; preselects the row's current entry.
    pub(crate) fn for_catalog(
        title: &str,
        options: &[CatalogOption],
        current: Option<i64>,
    ) -> Option<Self> {
        if options.is_empty() {
            return None;
        }
        let selected = current
            .and_then(|id| options.iter().position(|option| option.id == id))
            .unwrap_or(0);
        Some(Self {
            title: title.to_string(),
            options: options
                .iter()
                .map(|option| format!("{} - {}", option.id, option.label))
                .collect(),
            choices: options
                .iter()
                .map(|option| PopupChoice::Catalog(option.id))
                .collect(),
            selected,
        })
    }

    pub(crate) fn select_previous(&mut self) {
        if self.options.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.options.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub(crate) fn select_next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.options.len();
    }

    pub(crate) fn choose(self) -> Option<PopupChoice> {
        self.choices.into_iter().nth(self.selected)
    }

    pub(crate) fn as_render(&self) -> PopupRender<'_> {
        PopupRender {
            title: &self.title,
            options: &self.options,
            selected: self.selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_popup_starts_on_current_entry() {
        let options = vec![
            CatalogOption {
                id: 1,
                label: "Flour".into(),
                price: 2.0,
            },
            CatalogOption {
                id: 4,
                label: "Butter".into(),
                price: 9.0,
            },
        ];
        let mut popup = PopupState::for_catalog("Ingredient", &options, Some(4)).expect("popup");
        assert_eq!(popup.as_render().options[1], "4 - Butter");
        popup.select_next();
        assert_eq!(popup.choose(), Some(PopupChoice::Catalog(1)));
    }

    #[test]
    fn field_popup_wraps_backwards() {
        let options = vec!["1 - Ana".to_string(), "2 - Bruno".to_string()];
        let mut popup = PopupState::for_field("Client", &options, "").expect("popup");
        popup.select_previous();
        assert_eq!(popup.choose(), Some(PopupChoice::Text("2 - Bruno".into())));
    }

    #[test]
    fn empty_options_open_nothing() {
        assert!(PopupState::for_field("Client", &[], "").is_none());
        assert!(PopupState::for_catalog("Product", &[], None).is_none());
    }
}
