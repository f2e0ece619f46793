//! Compile-time package registration tests

use trellis_domain::registry::{PACKAGES, PackageEntry, discover_packages, list_packages};
use trellis_domain::{PackageDefinition, PackageManifest};

fn greeting_package() -> PackageDefinition {
    PackageDefinition::new(PackageManifest::new("greeting")).with_message("hello", "Hallo")
}

#[linkme::distributed_slice(PACKAGES)]
static GREETING_PACKAGE: PackageEntry = PackageEntry {
    name: "greeting",
    description: "Greeting messages",
    definition: greeting_package,
};

#[test]
fn test_registered_package_is_discovered() {
    let packages = discover_packages().unwrap();
    let greeting = packages
        .iter()
        .find(|p| p.name() == "greeting")
        .expect("greeting package should be registered");

    assert_eq!(greeting.messages.get("hello").map(String::as_str), Some("Hallo"));
    assert!(list_packages().contains(&("greeting", "Greeting messages")));
}
