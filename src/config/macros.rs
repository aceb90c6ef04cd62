/// Declare a configuration section with its defaults inline
///
/// ```ignore
/// config_struct! {
///     pub struct MonitorConfig {
///         reconnect_max_secs: u64 = 30,
///         watched_programs: Vec<String> = Vec::new(),
///     }
/// }
/// ```
///
/// Expands to a struct with public fields, a `Default` impl using the
/// listed values and serde derives with `#[serde(default)]`, so a TOML file
/// only needs the keys it overrides. Unknown keys are rejected to catch typos.
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default, deny_unknown_fields)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
