use attractor::{logging, ui};

fn main() -> anyhow::Result<()> {
    logging::init()?;
    log::info!("starting attractor");
    let result = ui::run();
    log::info!("shutting down");
    result
}
