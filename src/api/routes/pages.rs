// api/routes/pages.rs
//
// Pages marketing publiques. Purement présentationnel: aucun appel backend,
// seule la landing regarde le cookie de session pour adapter son CTA.
use actix_web::{get, HttpResponse};

use crate::api::ui;
use crate::core::SessionUser;

#[get("/")]
pub async fn landing(session: Option<SessionUser>) -> HttpResponse {
    let cta = if session.is_some() {
        "<a class=\"cta\" href=\"/dashboard\">Go to your dashboard</a>"
    } else {
        "<a class=\"cta\" href=\"/signup\">Start creating free</a>\
         <a class=\"ghost\" href=\"/login\">Log in</a>"
    };

    let body = format!(
        "<section class=\"hero\">\
<h1>Studio-quality videos from a script, in minutes</h1>\
<p>Write in Hindi or English, pick a presenter, and let VidyoBharat render a\
 ready-to-post video with voice-over, captions and music.</p>\
<div class=\"hero-actions\">{}</div>\
</section>\
<section class=\"feature-grid\">\
<article><h3>Avatar presenters</h3><p>Lifelike presenters that speak your script\
 in 10+ Indian languages.</p></article>\
<article><h3>Template library</h3><p>Corporate, education and reel layouts,\
 tuned for every aspect ratio.</p></article>\
<article><h3>Image studio</h3><p>Generate thumbnails and b-roll stills from a\
 prompt, then upscale or detour them.</p></article>\
<article><h3>Credit-based pricing</h3><p>Pay only for what you render. Estimates\
 before every generation.</p></article>\
</section>\
<section class=\"workflow\">\
<h2>Script to screen in three steps</h2>\
<ol><li>Choose an avatar or template</li><li>Paste your script and pick a voice</li>\
<li>Review the estimate and generate</li></ol>\
</section>",
        cta
    );
    ui::marketing_page("AI video generation for India", &body)
}

/// Gabarit partagé des pages d'information
fn info_page(title: &str, tagline: &str, sections: &[(&str, &str)]) -> HttpResponse {
    let sections_html: String = sections
        .iter()
        .map(|(heading, text)| {
            format!(
                "<section class=\"info-section\"><h2>{}</h2><p>{}</p></section>",
                ui::escape(heading),
                ui::escape(text)
            )
        })
        .collect();
    let body = format!(
        "<section class=\"info-hero\"><h1>{}</h1><p>{}</p></section>{}",
        ui::escape(title),
        ui::escape(tagline),
        sections_html
    );
    ui::marketing_page(title, &body)
}

#[get("/pricing")]
pub async fn pricing() -> HttpResponse {
    let body = "<section class=\"info-hero\"><h1>Pricing</h1>\
<p>Simple credit packs. Every render shows its estimate before you commit.</p></section>\
<section class=\"plans\">\
<article class=\"plan\"><h3>Free</h3><p class=\"price\">₹0</p>\
<ul><li>20 credits each month</li><li>Watermarked renders</li><li>720p output</li></ul>\
<a class=\"cta\" href=\"/signup\">Get started</a></article>\
<article class=\"plan featured\"><h3>Creator</h3><p class=\"price\">₹999/mo</p>\
<ul><li>500 credits each month</li><li>1080p output</li><li>Priority rendering</li></ul>\
<a class=\"cta\" href=\"/signup\">Start free trial</a></article>\
<article class=\"plan\"><h3>Studio</h3><p class=\"price\">₹4,999/mo</p>\
<ul><li>3000 credits each month</li><li>Team workspaces</li><li>API access</li></ul>\
<a class=\"cta\" href=\"/company\">Talk to us</a></article>\
</section>";
    ui::marketing_page("Pricing", body)
}

#[get("/platform")]
pub async fn platform() -> HttpResponse {
    info_page(
        "Platform",
        "One pipeline from script to published video.",
        &[
            ("Script intelligence", "Generate or refine reel scripts with hooks, CTAs and hashtags tuned for Indian audiences."),
            ("Neural voices", "Natural Hindi and English voice-overs with regional accents and sample-rate control."),
            ("Rendering at scale", "Renders run on managed GPU workers; you watch progress live and download when done."),
        ],
    )
}

#[get("/business")]
pub async fn business() -> HttpResponse {
    info_page(
        "For Business",
        "Product explainers, training and festive campaigns without a studio.",
        &[
            ("Brand kits", "Upload logos and backgrounds once, reuse them across every project."),
            ("Team workflows", "Shared projects with render history and per-member credit tracking."),
            ("Compliance", "Data stays in-region; generated media is watermark-traceable."),
        ],
    )
}

#[get("/company")]
pub async fn company() -> HttpResponse {
    info_page(
        "Company",
        "We are building the creative stack for the next billion creators.",
        &[
            ("Our story", "Started in Bengaluru in 2024 by filmmakers and ML engineers who wanted video creation to feel like writing."),
            ("Careers", "We hire across engineering, research and creator relations. Remote-first within India."),
            ("Contact", "hello@vidyobharat.dev for partnerships and press."),
        ],
    )
}

#[get("/use-cases")]
pub async fn use_cases() -> HttpResponse {
    info_page(
        "Use Cases",
        "From daily reels to product launches.",
        &[
            ("Creators", "Turn trending topics into POV reels with history and mythology templates."),
            ("Educators", "Lesson explainers with captions in the student's language."),
            ("D2C brands", "Product videos in every aspect ratio, generated from one script."),
        ],
    )
}

#[get("/learning")]
pub async fn learning() -> HttpResponse {
    info_page(
        "Learning",
        "Guides and playbooks to get the most out of every credit.",
        &[
            ("Getting started", "Your first video in five minutes: choosing a base, writing a script, reading the estimate."),
            ("Script writing", "Hooks that survive the first two seconds, and why shorter scripts often render better."),
            ("Publishing", "Aspect ratios, caption styles and music ducking for each platform."),
        ],
    )
}
