//! `models` — list the capability table.

use promptbound_context::Router;
use promptbound_core::error::Result;

pub fn run() -> Result<()> {
    let router = Router::default();

    println!(
        "{:<18} {:<12} {:>9} {:>10} {:>8} {:>6}",
        "MODEL", "PROVIDER", "MAX TOK", "IN $/1K", "QUALITY", "SPEED"
    );
    for spec in router.catalog().iter() {
        println!(
            "{:<18} {:<12} {:>9} {:>10.4} {:>8.2} {:>6.2}",
            spec.name, spec.provider, spec.max_tokens, spec.cost_per_1k_input, spec.quality, spec.speed
        );
    }

    Ok(())
}
