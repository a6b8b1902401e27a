use dotenvy::dotenv;

// Optional overrides baked in at compile time. When unset the dashboard falls
// back to the page origin at runtime.
const BUILD_VARS: [&str; 2] = ["API_BASE_URL", "CHANNEL_URL"];

fn main() {
  // Tell Cargo that if the env file changes, to rerun this build script.
  println!("cargo::rerun-if-changed=.env");

  if dotenv().is_err() {
    println!("cargo::warning=no .env file found, using runtime defaults");
  }

  for var in BUILD_VARS {
    println!("cargo::rerun-if-env-changed={}", var);
    if let Ok(value) = std::env::var(var) {
      println!("cargo::rustc-env={}={}", var, value);
    }
  }
}
