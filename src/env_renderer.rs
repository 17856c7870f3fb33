//! Renders the configuration file with environment variables that are prefixed with `WSCHAT_`.
//! Inside the template, the variable is available without the prefix.

use tera::Tera;

#[derive(Debug)]
pub struct EnvRenderer {
    context: tera::Context,
}

const PREFIX: &str = "WSCHAT_";

impl EnvRenderer {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut context = tera::Context::new();
        for (key, value) in vars {
            if let Some(name) = key.strip_prefix(PREFIX) {
                context.insert(name, &value);
            }
        }

        EnvRenderer { context }
    }

    pub fn render(&self, template: &str) -> Result<String, anyhow::Error> {
        let mut tera = Tera::default();
        Ok(tera.render_str(template, &self.context)?)
    }
}
