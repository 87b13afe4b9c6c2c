use flexi_logger::Logger;

pub fn init_logging() -> anyhow::Result<()> {
    Logger::try_with_env_or_str("warn")?.start()?;
    Ok(())
}
