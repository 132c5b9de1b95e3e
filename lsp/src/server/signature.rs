use tower_lsp::lsp_types::{ParameterInformation, ParameterLabel, SignatureInformation};

use hept_core::SignatureRepr;

pub(crate) fn to_signature_information(repr: SignatureRepr, active: u32) -> SignatureInformation {
    SignatureInformation {
        label: repr.label,
        documentation: None,
        parameters: Some(
            repr.parameters
                .into_iter()
                .map(|p| ParameterInformation {
                    label: ParameterLabel::Simple(p),
                    documentation: None,
                })
                .collect(),
        ),
        active_parameter: Some(active),
    }
}
