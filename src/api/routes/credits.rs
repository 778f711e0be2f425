// api/routes/credits.rs
use actix_web::{get, web, HttpRequest, HttpResponse};

use crate::api::ui;
use crate::core::{SessionDisplay, SessionUser};
use crate::services::BackendClient;

/// Historique de consommation: solde en tête, transactions en dessous.
/// Le backend fait foi sur tout, la page ne calcule rien.
#[get("/credits/history")]
pub async fn credits_history_page(
    req: HttpRequest,
    session: Option<SessionUser>,
    backend: web::Data<BackendClient>,
) -> HttpResponse {
    let Some(session) = session else {
        return ui::redirect("/login");
    };
    let display = SessionDisplay::from_request(&req);

    let wallet_html = match backend.get_wallet(&session.user_id).await {
        Ok(wallet) => format!(
            "<section class=\"card wallet-card\">\
<p class=\"big\">{current}</p><p class=\"muted\">credits left on the {plan} plan</p>\
<p class=\"hint\">{used} of {monthly} used since {reset}</p></section>",
            current = wallet.current_credits,
            plan = ui::escape(&wallet.plan_name),
            used = wallet.used_credits,
            monthly = wallet.monthly_credits,
            reset = wallet.last_reset.format("%d %b %Y"),
        ),
        Err(err) => ui::error_banner(Some(&err.display_message())),
    };

    let history_html = match backend.get_credit_history(&session.user_id).await {
        Ok(history) if history.items.is_empty() => {
            "<p class=\"empty-state\">No transactions yet.</p>".to_string()
        }
        Ok(history) => {
            let rows: String = history
                .items
                .iter()
                .map(|item| {
                    format!(
                        "<tr><td>{date}</td><td>{feature}</td><td>{kind}</td>\
<td class=\"num\">-{used}</td><td class=\"num\">{balance}</td></tr>",
                        date = item.created_at.format("%d %b %Y %H:%M"),
                        feature = ui::escape(&item.feature_name),
                        kind = ui::escape(&item.transaction_type),
                        used = item.credits_used,
                        balance = item.remaining_balance,
                    )
                })
                .collect();
            format!(
                "<table class=\"table\"><thead><tr><th>Date</th><th>Feature</th>\
<th>Type</th><th>Credits</th><th>Balance</th></tr></thead><tbody>{}</tbody></table>",
                rows
            )
        }
        Err(err) => ui::error_banner(Some(&err.display_message())),
    };

    let body = format!(
        "<div class=\"page-head\"><h1>Credits</h1></div>{}{}",
        wallet_html, history_html
    );
    ui::app_page("Credits", "/credits/history", &display, &[], &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::auth::test_support::test_config;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use wiremock::matchers::{method, path as urlpath};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[actix_web::test]
    async fn test_history_page_renders_wallet_and_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(urlpath("/credits/wallet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "currentCredits": 42,
                "monthlyCredits": 500,
                "usedCredits": 458,
                "planName": "Creator",
                "lastReset": "2025-11-01T00:00:00Z"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(urlpath("/credits/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{
                    "id": 1,
                    "featureName": "video_create",
                    "creditsUsed": 12,
                    "remainingBalance": 42,
                    "transactionType": "debit",
                    "source": "wizard",
                    "metadata": {},
                    "createdAt": "2025-11-02T09:30:00Z"
                }]
            })))
            .mount(&server)
            .await;

        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(BackendClient::new(&server.uri(), 5)))
                .app_data(web::Data::new(test_config()))
                .service(credits_history_page),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/credits/history")
            .cookie(actix_web::cookie::Cookie::new("vidyo_user_id", "u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
        assert!(html.contains("video_create"));
        assert!(html.contains("Creator"));
    }

    #[actix_web::test]
    async fn test_history_requires_session() {
        let server = MockServer::start().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(BackendClient::new(&server.uri(), 5)))
                .app_data(web::Data::new(test_config()))
                .service(credits_history_page),
        )
        .await;
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/credits/history").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }
}
