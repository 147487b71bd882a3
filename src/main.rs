use memphis3d::app;
use memphis3d::config::Settings;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env();
    if let Some(source) = settings.matcap.as_ref() {
        log::info!("Matcap requested from {}", source);
    }

    pollster::block_on(app::run(settings));
}
