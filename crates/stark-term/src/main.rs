use anyhow::Result;
use stark_term::application::cli;
use stark_term::destruct_terminal_for_panic;

fn handle_panic(info: &std::panic::PanicHookInfo<'_>) {
    destruct_terminal_for_panic();
    better_panic::Settings::auto()
        .most_recent_first(false)
        .lineno_suffix(true)
        .create_panic_handler()(info);
}

#[tokio::main]
async fn main() -> Result<()> {
    std::panic::set_hook(Box::new(handle_panic));
    cli::parse().await
}
