use actix_web::{HttpResponse, web};

use crate::configuration::SiteSettings;

/// The checkbox catalogue offered on the feedback form.
///
/// The storage layer treats improvements as free-form tags; this list is only
/// what the page offers to tick.
pub const IMPROVEMENT_OPTIONS: [&str; 7] = [
    "Topic & Content The subject matter or the points discussed.",
    "Accommodation The way the discussion was facilitated and guided.",
    "Pacing & Time Management The flow and length of the session.",
    "Audience Interaction Opportunities for questions and participation.",
    "Logistics The venue, technology, or pre-event communication.",
    "No improvements needed, I was satisfied.",
    "Other (please specify): _______",
];

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct FormDescriptor {
    title: String,
    description: String,
    base_url: String,
    improvement_options: Vec<&'static str>,
}

/// Everything a client needs to render the feedback page.
pub async fn form_descriptor(site: web::Data<SiteSettings>) -> HttpResponse {
    HttpResponse::Ok().json(FormDescriptor {
        title: site.name.clone(),
        description: site.description.clone(),
        base_url: site.base_url.clone(),
        improvement_options: IMPROVEMENT_OPTIONS.to_vec(),
    })
}
