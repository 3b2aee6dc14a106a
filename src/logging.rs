// ログ初期化

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LogConfig;
use crate::error::{ViewstatsError, ViewstatsResult};

/// `RUST_LOG` が優先、なければ指定レベル
fn build_filter(level: &str) -> ViewstatsResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| ViewstatsError::config(format!("invalid log level: {}", e)))
}

fn stderr_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
}

/// クロージャの実行中だけstderrのみのサブスクライバーを有効にする（設定読み込み用）
pub fn with_bootstrap_logging<T>(level: &str, f: impl FnOnce() -> T) -> ViewstatsResult<T> {
    let subscriber = tracing_subscriber::registry()
        .with(build_filter(level)?)
        .with(stderr_layer());
    Ok(tracing::subscriber::with_default(subscriber, f))
}

/// ログ初期化
///
/// `RUST_LOG` が設定されていればそれを優先し、なければ設定のレベルを使う。
/// `log_dir` が指定されている場合は日次ローテーションのファイル出力も追加し、
/// 書き込みスレッドのガードを返す（呼び出し側で保持すること）。
pub fn init_logging(config: &LogConfig) -> ViewstatsResult<Option<WorkerGuard>> {
    let env_filter = build_filter(&config.level)?;

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| ViewstatsError::config(format!("failed to initialise logging: {}", e)))?;

    Ok(guard)
}
