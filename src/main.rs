// SPDX-License-Identifier: GPL-3.0-only
use monitorinfo::{config::Config, fl, localize::localize, sysinfo::SystemInfo};

#[macro_use]
extern crate tracing;

fn setup_logs(default_filter: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            default_filter
                .map(str::to_string)
                .unwrap_or_else(|| format!("warn,{}=warn", env!("CARGO_CRATE_NAME"))),
        )
    });

    if let Ok(journal_layer) = tracing_journald::layer() {
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .with(journal_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    }
}

fn print_system(info: &SystemInfo, unknown: &str) {
    let or_unknown = |value: &Option<String>| value.clone().unwrap_or_else(|| unknown.to_string());

    println!("{}", fl!("system"));
    println!("  {}", fl!("operating-system", value = or_unknown(&info.os)));
    println!("  {}", fl!("hardware-model", value = or_unknown(&info.hardware_model)));
    println!("  {}", fl!("bios-version", value = or_unknown(&info.bios_version)));
    println!("  {}", fl!("cpu-model", value = or_unknown(&info.cpu_model)));
    println!("  {}", fl!("kernel-version", value = or_unknown(&info.kernel_version)));
    println!();
}

fn main() {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    setup_logs(config.log_filter.as_deref());
    if let Some(e) = config_error {
        error!("can't load config: {:?}", e);
    }

    localize();

    let unknown = fl!("unknown");

    if config.system_info {
        print_system(&SystemInfo::collect(), &unknown);
    }

    let monitors = monitorinfo::monitors(&config);
    info!("{} monitor(s) via {:?}", monitors.len(), config.backend);

    println!("{}", fl!("monitors"));
    if monitors.is_empty() {
        println!("  {}", fl!("no-monitors"));
    }
    for monitor in &monitors {
        println!("  {}", fl!("monitor-model", model = monitor.model_or(&unknown)));
        println!("    {}", fl!("monitor-serial", serial = monitor.serial_or(&unknown)));
    }
}
