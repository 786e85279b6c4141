//! The built-in single mutators.

mod boolean_literal;
mod diamond;
mod is_empty;
mod literals_first;
mod optional;
mod semicolon;
mod stream;
mod var;
mod wrapper;

pub use boolean_literal::BooleanLiteralComparison;
pub use diamond::UseDiamondOperator;
pub use is_empty::{CollectionIsEmpty, StringIsEmpty};
pub use literals_first::LiteralsFirstInComparisons;
pub use optional::OptionalNotEmpty;
pub use semicolon::UnnecessarySemicolon;
pub use stream::StreamAnyMatch;
pub use var::LocalVariableTypeInference;
pub use wrapper::PrimitiveWrapperInstantiation;

use crate::catalog::MutatorFactory;

pub(crate) static SINGLE_MUTATORS: &[MutatorFactory] = &[
    MutatorFactory {
        name: "BooleanLiteralComparison",
        build: || Box::new(BooleanLiteralComparison),
    },
    MutatorFactory {
        name: "CollectionIsEmpty",
        build: || Box::new(CollectionIsEmpty),
    },
    MutatorFactory {
        name: "LiteralsFirstInComparisons",
        build: || Box::new(LiteralsFirstInComparisons),
    },
    MutatorFactory {
        name: "LocalVariableTypeInference",
        build: || Box::new(LocalVariableTypeInference),
    },
    MutatorFactory {
        name: "OptionalNotEmpty",
        build: || Box::new(OptionalNotEmpty),
    },
    MutatorFactory {
        name: "PrimitiveWrapperInstantiation",
        build: || Box::new(PrimitiveWrapperInstantiation),
    },
    MutatorFactory {
        name: "StreamAnyMatch",
        build: || Box::new(StreamAnyMatch),
    },
    MutatorFactory {
        name: "StringIsEmpty",
        build: || Box::new(StringIsEmpty),
    },
    MutatorFactory {
        name: "UnnecessarySemicolon",
        build: || Box::new(UnnecessarySemicolon),
    },
    MutatorFactory {
        name: "UseDiamondOperator",
        build: || Box::new(UseDiamondOperator),
    },
];
