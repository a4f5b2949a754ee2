#[cfg(not(any(feature = "cli")))]
fn main() {}

#[cfg(feature = "cli")]
fn main() -> addr2sym::prelude::FdResult<()> {
    let cfg = addr2sym::prelude::Config::new();
    addr2sym::cli::init(&cfg)
}
