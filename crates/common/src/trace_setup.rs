use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub fn init_tracing(log_level: &str) {

    use tracing_subscriber::EnvFilter;

    // stdout is reserved for command results, i.e. the created domain name.
    let fmt_layer = tracing_subscriber::fmt::Layer::default()
        .compact()
        .with_ansi(false)
        .with_writer(std::io::stderr);

    let filter_layer = EnvFilter::new(format!(
        "warn,hyper=WARN,reqwest=WARN,dosetup={0},dosetup_common={0},dosetup_schema={0}", log_level));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
