use indexmap::IndexMap;
use narwhal_layout::{Algorithm, CircleOptions, StressOptions};

/// Registry of named layout engines.
///
/// [`Context::new`] registers `stress`, `uniform` and `circle` with default options; callers can
/// replace them or add variants under new names.
#[derive(Debug, Clone)]
pub struct Context {
    engines: IndexMap<String, Algorithm>,
}

impl Default for Context {
    fn default() -> Self {
        let mut ctx = Self::empty();
        for algorithm in [
            Algorithm::Stress(StressOptions::default()),
            Algorithm::UniformStress(StressOptions::default()),
            Algorithm::Circle(CircleOptions::default()),
        ] {
            ctx.register(algorithm.name(), algorithm);
        }
        ctx
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with no engines registered.
    pub fn empty() -> Self {
        Self {
            engines: IndexMap::new(),
        }
    }

    /// Registers `algorithm` under `name`, returning the engine it replaced.
    pub fn register(&mut self, name: impl Into<String>, algorithm: Algorithm) -> Option<Algorithm> {
        self.engines.insert(name.into(), algorithm)
    }

    pub fn engine(&self, name: &str) -> Option<&Algorithm> {
        self.engines.get(name)
    }

    /// Engine names in registration order.
    pub fn engines(&self) -> impl Iterator<Item = &str> + '_ {
        self.engines.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_engines_are_registered_in_order() {
        let ctx = Context::new();
        assert_eq!(ctx.engines().collect::<Vec<_>>(), ["stress", "uniform", "circle"]);
        assert!(matches!(ctx.engine("uniform"), Some(Algorithm::UniformStress(_))));
        assert!(ctx.engine("dot").is_none());
    }

    #[test]
    fn register_replaces_existing_names() {
        let mut ctx = Context::new();
        let sparse = Algorithm::Stress(StressOptions {
            max_hops: Some(3),
            ..Default::default()
        });
        assert!(ctx.register("stress", sparse.clone()).is_some());
        assert_eq!(ctx.engine("stress"), Some(&sparse));
        assert!(ctx.register("sparse", sparse).is_none());
        assert_eq!(ctx.engines().count(), 4);
    }
}
