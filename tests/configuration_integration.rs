//! Environment overrides, in their own test binary since they mutate the
//! process environment.

use chirpy::configuration::get_configuration;

#[test]
fn environment_overrides_configuration_file() {
    std::env::set_var("APP_AUTH__JWT_SECRET", "production-signing-secret");
    std::env::set_var("APP_AUTH__POLKA_KEY", "production-webhook-key");
    std::env::set_var("APP_APPLICATION__PLATFORM", "prod");

    let settings = get_configuration().expect("Failed to read configuration.");

    assert_eq!(settings.auth.jwt_secret, "production-signing-secret");
    assert_eq!(settings.auth.polka_key, "production-webhook-key");
    assert_eq!(settings.application.platform, "prod");
    assert!(!settings.application.is_dev());
    // Untouched keys still come from the file
    assert_eq!(settings.database.database_name, "chirpy");
}
