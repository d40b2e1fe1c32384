use countries_etl::config::lambda::LambdaConfig;
use countries_etl::utils::{logger, validation::Validate};
use countries_etl::{CountryPipeline, EtlEngine, RunOutcome, S3Storage};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct Request {
    pub api_base_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
}

#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub outcome: RunOutcome,
    pub bucket: String,
    pub written: Vec<String>,
    pub failed: Vec<String>,
    pub countries: usize,
    pub translations: usize,
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting countries extraction Lambda");

    let Request {
        api_base_url,
        s3_bucket,
        s3_prefix,
    } = event.payload;

    let config = LambdaConfig::from_env()?.with_overrides(api_base_url, s3_bucket, s3_prefix);
    config.validate()?;

    let storage = S3Storage::from_settings(&config.storage_settings()).await;
    let bucket = config.s3_bucket.clone();
    let pipeline = CountryPipeline::from_config(storage, config)?;

    let report = EtlEngine::new(pipeline).run().await;

    // a failed run must surface as an invocation error so retries and alarms fire
    if matches!(
        report.outcome,
        RunOutcome::PrimaryFetchFailed | RunOutcome::NoCountries | RunOutcome::AllWritesFailed
    ) {
        return Err(format!("countries extraction failed: {:?}", report.outcome).into());
    }

    let response = Response {
        message: if report.outcome.is_success() {
            "Countries extraction completed successfully".to_string()
        } else {
            "Countries extraction completed with write failures".to_string()
        },
        outcome: report.outcome,
        bucket,
        written: report.load.written,
        failed: report.load.failed,
        countries: report.countries,
        translations: report.translations,
    };

    tracing::info!("Countries extraction Lambda finished: {:?}", response.outcome);
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
