use crate::state::AssistantConfig;

/// Show the tunable parameters, or set one of them.
pub fn config(config: &mut AssistantConfig, param: Option<&str>, value: Option<&str>) -> String {
    match (param, value) {
        (None, _) => format!(
            "Assistant configuration:\n  \
             model: {}\n  \
             context_size: {}\n  \
             top_k: {}",
            config.model, config.context_size, config.top_k
        ),
        (Some(key), Some(val)) => match config.set(key, val) {
            Ok(()) => format!("`{}` set to {}", key, val),
            Err(msg) => msg,
        },
        (Some(_), None) => {
            "Provide both a param and a value. Example: `config context_size 6000`".to_string()
        }
    }
}
