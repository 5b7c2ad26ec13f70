use std::process::exit;
use std::sync::Arc;

use plugvet::checks::builtin_checks;
use plugvet::net::HttpRegistryClient;

pub(crate) fn run() {
    let checks = match builtin_checks(Arc::new(HttpRegistryClient::new())) {
        Ok(checks) => checks,
        Err(err) => {
            eprintln!("error: {err}");
            exit(2);
        }
    };

    for check in checks.iter() {
        println!("{}", check.id());
        if !check.requires().is_empty() {
            println!("  requires: {}", check.requires().join(", "));
        }
        for kind in check.kinds() {
            let announce = if kind.announce { ", always announced" } else { "" };
            println!("  {} ({}{announce})", kind.name, kind.severity);
        }
    }
}
