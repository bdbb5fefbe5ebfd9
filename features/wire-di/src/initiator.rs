use std::{any::Any, collections::HashMap};

use crate::{
    classifier::{separate_creators, Classified},
    creator::{Creator, Output, Signature},
    errors::SetError,
    types::{Instance, TypeInfo},
};

/// Runs creators and registers what they produce
///
/// Creators without arguments run first, in supplied order. Creators with arguments run
/// afterwards, strictly in supplied order. Nothing is reordered - a creator depending on the
/// output of another creator with arguments must be supplied after it.
pub(crate) struct DiInitiator<'a> {
    instances: &'a mut HashMap<String, Instance>,
}
impl<'a> DiInitiator<'a> {
    pub(crate) fn new(instances: &'a mut HashMap<String, Instance>) -> DiInitiator<'a> {
        DiInitiator { instances }
    }

    /// Classifies and runs all supplied creators, aborting on the first error
    pub(crate) fn initiate(
        mut self,
        supplied: impl IntoIterator<Item = Box<dyn Any + Send>>,
    ) -> Result<(), SetError> {
        let Classified {
            without_args,
            with_args,
        } = separate_creators(supplied)?;

        self.set_without_args(without_args)?;
        self.set_with_args(with_args)
    }

    fn set_without_args(&mut self, creators: Vec<(TypeInfo, Creator)>) -> Result<(), SetError> {
        for (provides, creator) in creators {
            let key = dependency_key(provides)?;
            let outputs = creator.invoke(Vec::new())?;
            self.set_result(key, provides, outputs)?;
        }

        Ok(())
    }

    fn set_with_args(&mut self, creators: Vec<(TypeInfo, Creator)>) -> Result<(), SetError> {
        for (provides, creator) in creators {
            let key = dependency_key(provides)?;
            let args = self.resolve_args(&key, creator.signature())?;
            let outputs = creator.invoke(args)?;
            self.set_result(key, provides, outputs)?;
        }

        Ok(())
    }

    /// Looks up an instance for every declared input, in order
    fn resolve_args(
        &self,
        required_by: &str,
        signature: &Signature,
    ) -> Result<Vec<(String, Instance)>, SetError> {
        signature
            .inputs
            .iter()
            .map(|input| {
                let key = input
                    .key()
                    .unwrap_or_else(|| input.type_name.to_string());

                match self.instances.get(&key) {
                    Some(instance) => {
                        tracing::trace!("Resolved '{}' for '{}'", key, required_by);
                        Ok((key, instance.clone()))
                    }
                    None => Err(SetError::MissingDependency {
                        key,
                        required_by: required_by.to_string(),
                    }),
                }
            })
            .collect()
    }

    /// Validates the outputs of a creator and registers its value under `key`
    ///
    /// The value has to be of the type the creator declared as its first output.
    fn set_result(
        &mut self,
        key: String,
        provides: TypeInfo,
        outputs: Vec<Output>,
    ) -> Result<(), SetError> {
        let count = outputs.len();
        let mut outputs = outputs.into_iter();
        let (value, failure) = match (outputs.next(), outputs.next(), outputs.next()) {
            (Some(value), failure, None) => (value, failure),
            _ => return Err(SetError::InvalidResultArity { key, count }),
        };

        match failure {
            None | Some(Output::Failure(None)) => {}
            Some(Output::Failure(Some(source))) => {
                tracing::error!("Creator for '{}' failed: {}", key, source);
                return Err(SetError::CreatorFailed { key, source });
            }
            Some(Output::Value(_)) => return Err(SetError::InvalidErrorShape { key }),
        }

        let Output::Value(Some(instance)) = value else {
            return Err(SetError::EmptyResult { key });
        };
        if instance.info.type_id != provides.type_id {
            return Err(SetError::ResultTypeMismatch {
                key,
                declared: provides.type_name,
                actual: instance.info.type_name,
            });
        }

        tracing::debug!("Constructed instance of {} as '{}'", instance.info, key);
        if let Some(replaced) = self.instances.insert(key, instance) {
            tracing::debug!("Replaced previous instance of {}", replaced.info);
        }

        Ok(())
    }
}

/// Registry key of a creator's first output
fn dependency_key(provides: TypeInfo) -> Result<String, SetError> {
    if !provides.is_registrable() {
        return Err(SetError::InvalidDependencyType(provides));
    }

    provides
        .key()
        .ok_or(SetError::UndefinedDependencyName(provides))
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Arc};

    use rstest::rstest;

    use super::*;
    use crate::types::DynError;

    #[derive(Debug, Clone, PartialEq)]
    struct Pool {
        size: usize,
    }

    fn failure(message: &str) -> DynError {
        Box::new(io::Error::new(io::ErrorKind::Other, message.to_string()))
    }

    fn pool() -> Instance {
        Instance::new(Pool { size: 4 })
    }

    #[rstest]
    #[case(TypeInfo::of::<Pool>(), Ok("Pool"))]
    #[case(TypeInfo::of::<Arc<Pool>>(), Ok("Pool"))]
    #[case(TypeInfo::of::<i32>(), Err("invalid dependency type"))]
    #[case(TypeInfo::of::<Vec<Pool>>(), Err("invalid dependency type"))]
    #[case(TypeInfo::of::<(Pool, Pool)>(), Err("undefined dependency name"))]
    #[case(TypeInfo::of::<Arc<Vec<Pool>>>(), Err("undefined dependency name"))]
    fn test_dependency_key(#[case] provides: TypeInfo, #[case] expected: Result<&str, &str>) {
        let result = dependency_key(provides);

        match (result, expected) {
            (Ok(key), Ok(expected)) => assert_eq!(key, expected),
            (Err(error), Err(expected)) => assert!(
                error.to_string().starts_with(expected),
                "unexpected error: {error}"
            ),
            (result, expected) => panic!("expected {expected:?}, got {result:?}"),
        }
    }

    #[rstest]
    #[case(vec![Output::Value(Some(pool()))])]
    #[case(vec![Output::Value(Some(pool())), Output::Failure(None)])]
    fn test_set_result_registers_first_value(#[case] outputs: Vec<Output>) {
        let mut instances = HashMap::new();

        DiInitiator::new(&mut instances)
            .set_result("Pool".to_string(), TypeInfo::of::<Pool>(), outputs)
            .unwrap();

        let registered = instances.get("Pool").unwrap();
        assert_eq!(registered.downcast_ref::<Pool>(), Some(&Pool { size: 4 }));
    }

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![Output::Value(Some(pool())), Output::Failure(None), Output::Failure(None)], 3)]
    fn test_set_result_rejects_arity(#[case] outputs: Vec<Output>, #[case] expected: usize) {
        let mut instances = HashMap::new();

        let error = DiInitiator::new(&mut instances)
            .set_result("Pool".to_string(), TypeInfo::of::<Pool>(), outputs)
            .unwrap_err();

        assert!(matches!(error, SetError::InvalidResultArity { count, .. } if count == expected));
        assert!(instances.is_empty());
    }

    #[test]
    fn test_set_result_rejects_second_value() {
        let mut instances = HashMap::new();

        let error = DiInitiator::new(&mut instances)
            .set_result(
                "Pool".to_string(),
                TypeInfo::of::<Pool>(),
                vec![Output::Value(Some(pool())), Output::Value(Some(pool()))],
            )
            .unwrap_err();

        assert!(matches!(error, SetError::InvalidErrorShape { .. }));
        assert!(instances.is_empty());
    }

    #[test]
    fn test_set_result_surfaces_failure() {
        let mut instances = HashMap::new();

        let error = DiInitiator::new(&mut instances)
            .set_result(
                "Pool".to_string(),
                TypeInfo::of::<Pool>(),
                vec![
                    Output::Value(Some(pool())),
                    Output::Failure(Some(failure("pool exhausted"))),
                ],
            )
            .unwrap_err();

        let source = error.into_creator_failure().unwrap();
        assert_eq!(source.to_string(), "pool exhausted");
        assert!(instances.is_empty());
    }

    #[rstest]
    #[case(vec![Output::Value(None)])]
    #[case(vec![Output::Value(None), Output::Failure(None)])]
    #[case(vec![Output::Failure(None)])]
    fn test_set_result_rejects_missing_value(#[case] outputs: Vec<Output>) {
        let mut instances = HashMap::new();

        let error = DiInitiator::new(&mut instances)
            .set_result("Pool".to_string(), TypeInfo::of::<Pool>(), outputs)
            .unwrap_err();

        assert!(matches!(error, SetError::EmptyResult { .. }));
    }

    #[test]
    fn test_set_result_rejects_undeclared_type() {
        let mut instances = HashMap::new();

        let error = DiInitiator::new(&mut instances)
            .set_result(
                "Pool".to_string(),
                TypeInfo::of::<Pool>(),
                vec![Output::Value(Some(Instance::new(Arc::new(Pool { size: 4 }))))],
            )
            .unwrap_err();

        assert!(matches!(
            error,
            SetError::ResultTypeMismatch { ref key, declared, .. }
                if key == "Pool" && declared == std::any::type_name::<Pool>()
        ));
        assert!(instances.is_empty());
    }

    #[test]
    fn test_set_result_overwrites() {
        let mut instances = HashMap::new();
        instances.insert("Pool".to_string(), pool());

        DiInitiator::new(&mut instances)
            .set_result(
                "Pool".to_string(),
                TypeInfo::of::<Pool>(),
                vec![Output::Value(Some(Instance::new(Pool { size: 8 })))],
            )
            .unwrap();

        assert_eq!(instances.len(), 1);
        assert_eq!(
            instances["Pool"].downcast_ref::<Pool>(),
            Some(&Pool { size: 8 })
        );
    }

    #[test]
    fn test_resolve_args_in_declared_order() {
        let mut instances = HashMap::new();
        instances.insert("Pool".to_string(), pool());
        instances.insert("String".to_string(), Instance::new("name".to_string()));
        let initiator = DiInitiator::new(&mut instances);

        let args = initiator
            .resolve_args(
                "Service",
                &Signature {
                    inputs: vec![TypeInfo::of::<String>(), TypeInfo::of::<Pool>()],
                    outputs: vec![],
                },
            )
            .unwrap();

        let keys = args.iter().map(|(key, _)| key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["String", "Pool"]);
    }

    #[test]
    fn test_resolve_args_reports_missing() {
        let mut instances = HashMap::new();
        let initiator = DiInitiator::new(&mut instances);

        let error = initiator
            .resolve_args(
                "Service",
                &Signature {
                    inputs: vec![TypeInfo::of::<Arc<Pool>>()],
                    outputs: vec![],
                },
            )
            .unwrap_err();

        assert!(matches!(
            error,
            SetError::MissingDependency { ref key, ref required_by }
                if key == "Pool" && required_by == "Service"
        ));
    }
}
