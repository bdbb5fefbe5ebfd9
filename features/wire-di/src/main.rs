use std::{error::Error, fmt, sync::Arc};

use tracing_subscriber::EnvFilter;
use wire_di::{Creator, DiBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = DiBuilder::new()
        .add(|greeting: Greeting, target: Target| {
            Arc::new(Greeter {
                message: format!("{}, {}!", greeting.0, target.0),
            })
        })
        .add_instance(Greeting("Hello".to_string()))
        .add_creator(Creator::fallible(|| {
            std::env::var("GREET_TARGET")
                .or_else(|_| Ok::<_, std::env::VarError>("world".to_string()))
                .map(Target)
        }))
        .build()?;

    println!("{:?}", app);
    let greeter = app.get_cloned::<Arc<Greeter>>("Greeter");
    match greeter {
        Some(greeter) => println!("{}", greeter),
        None => println!("No greeter registered"),
    }

    Ok(())
}

#[derive(Debug, Clone)]
struct Greeting(String);

#[derive(Debug, Clone)]
struct Target(String);

#[derive(Debug)]
struct Greeter {
    message: String,
}
impl fmt::Display for Greeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
