use ctor::ctor;
use tracing::Level;

#[ctor]
fn set_debug_level() {
    // If DEBUG_TREEDEC is not set or set to false, leave logging disabled.
    if std::env::var("DEBUG_TREEDEC").is_ok_and(|v| !(v == "0" || v == "false" || v.is_empty())) {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
