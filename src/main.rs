use anicatalog::{Config, run};

fn main() -> anyhow::Result<()> {
    let worker_threads = Config::load()
        .map(|config| config.general.worker_threads)
        .unwrap_or(0);

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run())
}
