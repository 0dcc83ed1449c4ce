//! Environment source: IDEAGEN__SECTION__KEY, e.g. IDEAGEN__RATE_LIMIT__WINDOW_SECS=60.
//! IDEAGEN__CATALOG__MODELS takes a comma-separated list.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("IDEAGEN")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("catalog.models")
            .try_parsing(true),
    )
}
