//! reCAPTCHA widget and script markup

const API_SCRIPT: &str = r#"<script src="https://www.google.com/recaptcha/api.js" async defer></script>"#;

/// Supported reCAPTCHA flavours, parsed from their names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecaptchaVersion {
    V2Checkbox,
    V2Invisible,
    V3,
}

impl RecaptchaVersion {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "V2Checkbox" => Some(Self::V2Checkbox),
            "V2Invisible" => Some(Self::V2Invisible),
            "V3" => Some(Self::V3),
            _ => None,
        }
    }

    fn submits_via_callback(self) -> bool {
        matches!(self, Self::V2Invisible | Self::V3)
    }
}

/// Widget markup; unknown versions render nothing
pub fn tag(version: &str, site_key: &str) -> String {
    match RecaptchaVersion::from_name(version) {
        Some(RecaptchaVersion::V2Checkbox) => {
            format!(r#"<div class="g-recaptcha" data-sitekey="{}"></div>"#, site_key)
        }
        Some(RecaptchaVersion::V2Invisible) => format!(
            r#"<button class="g-recaptcha" data-sitekey="{}" data-callback="onSubmit">Submit</button>"#,
            site_key
        ),
        Some(RecaptchaVersion::V3) => format!(
            r#"<button class="g-recaptcha" data-sitekey="{}" data-callback="onSubmit" data-action="submit">Submit</button>"#,
            site_key
        ),
        None => String::new(),
    }
}

/// API loader, plus a submit callback for callback-driven versions
pub fn script(form_id: &str, version: &str) -> String {
    let mut script = API_SCRIPT.to_string();
    if RecaptchaVersion::from_name(version).is_some_and(RecaptchaVersion::submits_via_callback) {
        script.push_str(&format!(
            r#"<script>function onSubmit(token) {{ document.getElementById("{}").submit(); }}</script>"#,
            form_id
        ));
    }
    script
}
