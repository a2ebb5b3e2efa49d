pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // keep stdout clean for rendered catalog output.
        .with_writer(std::io::stderr)
        .init();
}
