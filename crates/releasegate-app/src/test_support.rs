use crate::{Pipeline, SubmissionInput};
use releasegate_domain::{PackCache, RoutingConfig};
use releasegate_types::{Channel, DraftContext, DraftSubmission};

pub fn builtin_pipeline() -> Pipeline {
    let pack = releasegate_settings::builtin_pack("generic.v0.1").expect("builtin pack");
    Pipeline::new(&pack, RoutingConfig::default(), &PackCache::new()).expect("compile pack")
}

pub fn input(text: &str) -> SubmissionInput {
    SubmissionInput {
        text: text.to_string(),
        channel: "email".to_string(),
        product: None,
        audience: None,
    }
}

pub fn submission(text: &str) -> DraftSubmission {
    DraftSubmission {
        text: text.to_string(),
        context: DraftContext {
            channel: Channel::Email,
            product: None,
            audience: None,
        },
    }
}
