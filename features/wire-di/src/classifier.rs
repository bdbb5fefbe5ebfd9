use std::any::Any;

use crate::{creator::Creator, errors::SetError, types::TypeInfo};

/// Creators split by whether they need registered instances to run
///
/// Each creator is paired with the type of its first output.
#[derive(Debug, Default)]
pub(crate) struct Classified {
    pub without_args: Vec<(TypeInfo, Creator)>,
    pub with_args: Vec<(TypeInfo, Creator)>,
}

/// Separates supplied values into creators with and without arguments
///
/// Input order is kept within both groups. Stops at the first value which is not a creator or
/// which declares no output.
pub(crate) fn separate_creators(
    supplied: impl IntoIterator<Item = Box<dyn Any + Send>>,
) -> Result<Classified, SetError> {
    let mut classified = Classified::default();

    for (position, value) in supplied.into_iter().enumerate() {
        let creator = match value.downcast::<Creator>() {
            Ok(creator) => *creator,
            Err(_) => return Err(SetError::InvalidCreatorType { position }),
        };

        let Some(provides) = creator.signature().provides() else {
            return Err(SetError::NoReturnValue { position });
        };

        if creator.is_zero_arg() {
            classified.without_args.push((provides, creator));
        } else {
            classified.with_args.push((provides, creator));
        }
    }

    tracing::debug!(
        "Classified {} creators without and {} with arguments",
        classified.without_args.len(),
        classified.with_args.len()
    );

    Ok(classified)
}
