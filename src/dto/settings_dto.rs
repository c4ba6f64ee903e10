use serde::Deserialize;

use crate::services::settings::SystemSettings;

// Request de administrador; los campos ausentes conservan su valor
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSettingsRequest {
    pub enable_registration: Option<bool>,
    pub enable_login: Option<bool>,
}

impl UpdateSettingsRequest {
    pub fn merge(self, current: SystemSettings) -> SystemSettings {
        SystemSettings {
            enable_registration: self.enable_registration.unwrap_or(current.enable_registration),
            enable_login: self.enable_login.unwrap_or(current.enable_login),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_absent_fields() {
        let req: UpdateSettingsRequest = serde_json::from_str(r#"{"enable_login": false}"#).unwrap();
        let merged = req.merge(SystemSettings::default());
        assert!(merged.enable_registration);
        assert!(!merged.enable_login);
    }
}
