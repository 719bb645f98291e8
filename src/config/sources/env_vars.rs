//! Environment source: STRATA__SECTION__KEY=value

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add `STRATA__`-prefixed environment variables, `__` separating nested keys.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("STRATA")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
