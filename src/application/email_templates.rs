use chrono::{DateTime, Utc};
use url::Url;

const BRAND_NAME: &str = "Polypost";

fn origin_label(frontend_url: &str) -> String {
    Url::parse(frontend_url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()))
        .unwrap_or_else(|| frontend_url.to_string())
}

pub fn primary_button(url: &str, label: &str) -> String {
    format!(
        r#"<a href="{url}" style="display:inline-block;padding:12px 18px;background-color:#111827;color:#ffffff;text-decoration:none;border-radius:8px;font-weight:600;">{label}</a>"#
    )
}

/// "You've reached your monthly X limit" upgrade nudge. Fired at most once
/// per month per kind, on the increment that crosses the limit.
pub fn limit_reached_email(frontend_url: &str, kind_label: &str) -> (String, String) {
    let subject = format!("You've reached your monthly {kind_label} limit");
    let headline = format!("Monthly {kind_label} limit reached");
    let lead = format!(
        "You've used all {kind_label} generations included in your {BRAND_NAME} plan."
    );
    let pricing_url = format!("{}/pricing", frontend_url.trim_end_matches('/'));
    let button = primary_button(&pricing_url, "View plans");
    let body = format!(
        r#"{button}<p style="margin:12px 0 0;color:#374151;">Upgrade to unlock more {kind_label} generations instantly.</p>"#
    );
    let reason = "you hit a usage limit on your plan";

    let html = wrap_email(frontend_url, &headline, &lead, &body, reason);
    (subject, html)
}

/// Reminder that a planned posting slot is due now.
pub fn posting_reminder_email(
    frontend_url: &str,
    platform: &str,
    scheduled_at: DateTime<Utc>,
    title: &str,
) -> (String, String) {
    let subject = format!("Time to post on {platform}");
    let headline = "Your posting slot is here";
    let lead = format!(
        "You planned to post on <strong>{platform}</strong> at {}.",
        scheduled_at.format("%Y-%m-%d %H:%M UTC")
    );
    let scheduler_url = format!("{}/scheduler", frontend_url.trim_end_matches('/'));
    let button = primary_button(&scheduler_url, "Open scheduler");
    let title_line = if title.is_empty() {
        String::new()
    } else {
        format!(r#"<p style="margin:12px 0 0;color:#374151;">{title}</p>"#)
    };
    let body = format!("{button}{title_line}");
    let reason = "you set a posting reminder";

    let html = wrap_email(frontend_url, headline, &lead, &body, reason);
    (subject, html)
}

/// Weekly recap of generated content and saved drafts.
pub fn weekly_summary_email(
    frontend_url: &str,
    username: &str,
    ideas_used: i32,
    captions_used: i32,
    drafts_count: i64,
) -> (String, String) {
    let subject = format!("Your weekly {BRAND_NAME} summary");
    let headline = "Your content summary";
    let lead = format!("Hi {username}, here's what you created this period:");
    let dashboard_url = format!("{}/dashboard", frontend_url.trim_end_matches('/'));
    let button = primary_button(&dashboard_url, "Open dashboard");
    let body = format!(
        r#"<ul style="margin:12px 0;color:#374151;padding-left:20px;">
          <li>Ideas generated: <b>{ideas_used}</b></li>
          <li>Captions generated: <b>{captions_used}</b></li>
          <li>Drafts saved: <b>{drafts_count}</b></li>
        </ul>
        {button}
        <p style="margin:12px 0 0;color:#374151;">Keep up the momentum. Consistent posting wins.</p>"#
    );
    let reason = "you have an active Polypost account";

    let html = wrap_email(frontend_url, headline, &lead, &body, reason);
    (subject, html)
}

pub fn wrap_email(
    frontend_url: &str,
    headline: &str,
    lead: &str,
    body_html: &str,
    reason: &str,
) -> String {
    let origin = origin_label(frontend_url);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <body style="background:#f8fafc;margin:0;padding:24px;font-family:Arial,Helvetica,sans-serif;">
    <div style="max-width:560px;margin:0 auto;background:#ffffff;border:1px solid #e5e7eb;border-radius:12px;padding:24px;box-shadow:0 8px 30px rgba(0,0,0,0.04);">
      <div style="font-size:12px;letter-spacing:0.08em;text-transform:uppercase;color:#6b7280;">{brand} - {origin}</div>
      <h1 style="margin:12px 0 8px;font-size:22px;color:#111827;">{headline}</h1>
      <p style="margin:0 0 12px;font-size:15px;color:#111827;line-height:1.6;">{lead}</p>
      {body_html}
      <div style="margin-top:20px;padding-top:16px;border-top:1px solid #e5e7eb;">
        <p style="margin:0 0 6px;font-size:13px;color:#4b5563;">Why you got this email: {reason}.</p>
        <p style="margin:0;font-size:13px;color:#4b5563;">If you didn't expect this, you can safely ignore it.</p>
      </div>
      <p style="margin:14px 0 4px;font-size:12px;color:#9ca3af;">Sent by {brand} - {origin}</p>
    </div>
  </body>
</html>
"#,
        brand = BRAND_NAME,
        origin = origin,
        headline = headline,
        lead = lead,
        body_html = body_html,
        reason = reason,
    )
}
