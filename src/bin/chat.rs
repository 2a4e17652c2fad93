//! Launcher for messaging apps.

fn main() -> anyhow::Result<()> {
    quicklaunch::init_tracing();
    quicklaunch::run(quicklaunch::Variant::Chat)
}
