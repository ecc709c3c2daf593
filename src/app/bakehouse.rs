use std::sync::Arc;

use anyhow::Result;

use crate::api::Gateway;

use super::{options::UiOptions, runtime::App};

/// Terminal front-end over a record gateway.
pub struct Bakehouse {
    gateway: Arc<dyn Gateway>,
    options: UiOptions,
}

impl Bakehouse {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            options: UiOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &UiOptions {
        &self.options
    }

    /// Takes over the terminal until the user quits.
    ///
    /// Must not be called from inside an async runtime; the app starts its
    /// own for the gateway requests.
    pub fn run(self) -> Result<()> {
        let Bakehouse { gateway, options } = self;
        let mut app = App::new(gateway, options)?;
        app.run()
    }
}

impl std::fmt::Debug for Bakehouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bakehouse")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
