/// Example program to print the loaded configuration
///
/// Run with: cargo run -p feednav-config --example print_config

fn main() {
    // Load configuration from feednav.toml
    let config = feednav_config::FeedNavConfig::load();

    println!("=== feednav Configuration ===\n");

    println!("Markers:");
    println!("  Content root id: {}", config.markers.content_root_id);
    println!("  App body: {}", config.markers.app_body);
    println!("  Feed: {}", config.markers.feed);
    println!("  Dynamic feed: {}", config.markers.dynamic_feed);
    println!("  Editorial: {}", config.markers.editorial);
    println!("  Card: {}", config.markers.card);
    println!("  Hidden: {}", config.markers.hidden);
    println!("  Selected: {}", config.markers.selected);
    println!();

    println!("Keys:");
    println!("  Row backward: {:?}", config.keys.row_backward);
    println!("  Row forward: {:?}", config.keys.row_forward);
    println!("  Column backward: {:?}", config.keys.column_backward);
    println!("  Column forward: {:?}", config.keys.column_forward);
    println!("  Confirm: {:?}", config.keys.confirm);
    println!();

    println!("Highlight:");
    println!("  Scroll block: {:?}", config.highlight.scroll_block);
    println!("  Smooth scroll: {}", config.highlight.smooth_scroll);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
