//! Check command implementation.
//!
//! Validates configuration and the disk usage command.

use diskstat_api::DiskUsageSource;

use crate::config::{validate_effective_config, Config};

/// Validates configuration and verifies that the disk usage command runs.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 diskstat-api - System Check");
    println!("==============================");

    let mut all_ok = true;

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
            println!("   ✅ Hostname policy: {}", config.hostname_policy());
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    // Check the disk usage command against the device root itself
    let df = config.df_command();
    let device_root = config.device_root();
    println!(
        "\n💾 Checking disk usage command '{} {}'...",
        df.program(),
        df.args().join(" ")
    );
    match df.report(device_root) {
        Ok(output) => {
            let rows = output.lines().filter(|l| !l.trim().is_empty()).count();
            println!("   ✅ Command ran for {} ({} line(s) of output)", device_root, rows);
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
