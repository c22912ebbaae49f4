// build.rs - generates the plugin's command permissions
#[cfg(feature = "tauri")]
const COMMANDS: &[&str] = &["start_listening", "stop_listening", "speak"];

fn main() {
    #[cfg(feature = "tauri")]
    tauri_plugin::Builder::new(COMMANDS).build();
}
