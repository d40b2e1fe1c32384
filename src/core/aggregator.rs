use crate::domain::model::{CountryRecord, TranslationRecord};
use crate::domain::ports::CountrySource;
use futures::stream::{self, StreamExt};

/// Looks up one translation per country, at most `concurrency` requests in
/// flight, and waits for all of them.
///
/// The lookup name is the `official` value of the first entry of the
/// country's `translations` mapping. Countries without one are skipped with a
/// warning. Failed lookups and empty answers (`null`, `[]`, `{}`) are dropped;
/// the rest keep the input order.
pub async fn fetch_all_translations<S>(
    source: &S,
    countries: &[CountryRecord],
    concurrency: usize,
) -> Vec<TranslationRecord>
where
    S: CountrySource + ?Sized,
{
    let names: Vec<String> = countries
        .iter()
        .filter_map(|country| {
            let name = country.first_translation_official();
            if name.is_none() {
                tracing::warn!(
                    "Skipping country '{}': no translation name to look up",
                    country.common_name().unwrap_or("<unnamed>")
                );
            }
            name.map(str::to_string)
        })
        .collect();

    let limit = concurrency.max(1);
    tracing::info!(
        "Fetching {} translations, up to {} in flight",
        names.len(),
        limit
    );

    let translations: Vec<TranslationRecord> = stream::iter(names)
        .map(|name| async move {
            let translation = source.fetch_translation(&name).await?;
            if translation.is_empty() {
                tracing::warn!("Empty translation response for '{}', dropping it", name);
                return None;
            }
            Some(translation)
        })
        .buffered(limit)
        .filter_map(|translation| async move { translation })
        .collect()
        .await;

    tracing::info!(
        "Fetched {} of {} translations",
        translations.len(),
        countries.len()
    );
    translations
}
