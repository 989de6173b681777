use common::{AutomobileSummary, NotificationPayload, PartSummary};

use crate::entity::{automobile, part, part_file};
use crate::utils::urls::FileUrls;

/// Describe a freshly uploaded file for the notification worker.
pub fn build_payload(
    urls: &FileUrls,
    automobile: &automobile::Model,
    part: &part::Model,
    part_file: &part_file::Model,
) -> NotificationPayload {
    NotificationPayload {
        automobile: AutomobileSummary {
            manufacturer: automobile.manufacturer.clone(),
            model: automobile.model.clone(),
            automobile_type: automobile.kind.clone(),
        },
        part: PartSummary {
            name: part.name.clone(),
            file_link: urls.file_url(&part_file.file),
        },
    }
}
