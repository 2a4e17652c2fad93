//! Launcher for music, notation and video apps.

fn main() -> anyhow::Result<()> {
    quicklaunch::init_tracing();
    quicklaunch::run(quicklaunch::Variant::Create)
}
