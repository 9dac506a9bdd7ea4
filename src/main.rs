fn main() -> anyhow::Result<()> {
    mydiary::cli::run()
}
