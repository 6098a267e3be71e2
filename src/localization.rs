use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Languages shipped with the bot, first one is the fallback
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "ru"];

const FALLBACK_LANGUAGE: &str = "en";

fn resource_source(language: &str) -> Option<&'static str> {
    match language {
        "en" => Some(include_str!("../locales/en/main.ftl")),
        "ru" => Some(include_str!("../locales/ru/main.ftl")),
        _ => None,
    }
}

/// Localization manager for the interview bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every supported language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for language in SUPPORTED_LANGUAGES {
            let locale: LanguageIdentifier = language.parse()?;
            let bundle = Self::create_bundle(&locale)?;
            bundles.insert(language.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier) -> Result<FluentBundle<FluentResource>> {
        let language = locale.language.as_str();
        let source = resource_source(language)
            .ok_or_else(|| anyhow!("No resource file for locale {locale}"))?;

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid resource for {locale}: {errors:?}"))?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Unicode isolation marks would end up inside relayed dates and ids
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Conflicting messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    /// Loaded language for a Telegram code such as `ru-RU`, if any
    pub fn supported_language(&self, code: &str) -> Option<&str> {
        let primary = code.split(['-', '_']).next()?.to_lowercase();
        self.bundles
            .get_key_value(primary.as_str())
            .map(|(key, _)| key.as_str())
    }

    /// Map a language code to a loaded language, English when unknown
    pub fn resolve_language(&self, language: Option<&str>) -> &str {
        language
            .and_then(|code| self.supported_language(code))
            .unwrap_or(FALLBACK_LANGUAGE)
    }

    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Get a localized message, falling back to English for unknown languages
    /// or keys missing from a translation
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let language = self.resolve_language(Some(language));

        let candidates = [language, FALLBACK_LANGUAGE];
        let found = candidates.iter().find_map(|lang| {
            let bundle = self.bundles.get(*lang)?;
            let pattern = bundle.get_message(key)?.value()?;
            Some((bundle, pattern))
        });

        let Some((bundle, pattern)) = found else {
            return format!("Missing translation: {key}");
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors)
            .into_owned();

        if !errors.is_empty() {
            warn!(key = key, language = language, errors = ?errors, "Fluent formatting errors");
        }

        value
    }
}

static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager
pub fn init_localization() -> Result<()> {
    if LOCALIZATION_MANAGER.get().is_none() {
        let manager = LocalizationManager::new()?;
        let _ = LOCALIZATION_MANAGER.set(manager);
    }
    Ok(())
}

/// Get the global localization manager, loading it on first use
pub fn get_localization_manager() -> &'static LocalizationManager {
    LOCALIZATION_MANAGER.get_or_init(|| {
        LocalizationManager::new().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load translations, messages will show keys");
            LocalizationManager {
                bundles: HashMap::new(),
            }
        })
    })
}

/// Localized message in the given language
pub fn t_lang(key: &str, language: Option<&str>) -> String {
    get_localization_manager().get_message_in_language(key, language.unwrap_or(FALLBACK_LANGUAGE), None)
}

/// Localized message with arguments in the given language
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language: Option<&str>) -> String {
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    get_localization_manager().get_message_in_language(
        key,
        language.unwrap_or(FALLBACK_LANGUAGE),
        Some(&args_map),
    )
}
