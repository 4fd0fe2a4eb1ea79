use clap::Parser;
use log::{info, warn};
use rDiag::{config::Config, dimacs, identify};
use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

fn main() -> anyhow::Result<()> {
    if env::var("RUST_LOG").is_err() {
        unsafe { env::set_var("RUST_LOG", "info") };
    }
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
    let cfg = Config::parse();
    info!("the model to be diagnosed: {}", cfg.model.display());
    let model = dimacs::read_model(&cfg.model)?;
    let task = model.prepare(&cfg.task())?;
    info!(
        "{} candidates, {} background constraints, {} clauses",
        task.c.len(),
        task.b.len(),
        task.kb.len()
    );
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))?;
    let res = identify::run(&task, cfg.engine, &cfg.identify(Some(stop.clone())))?;
    if stop.load(Ordering::Relaxed) {
        warn!("interrupted, the results below are incomplete");
    }
    for m in res.messages.iter() {
        println!("{m}");
    }
    if cfg.statistic {
        println!("{:#?}", res.statistic);
    }
    Ok(())
}
