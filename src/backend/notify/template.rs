/**
 * Violation Notice Template
 */

pub const VIOLATION_SUBJECT: &str = "Content Violation Alert";

/// Link to the community guidelines page of the web client
pub fn guidelines_link(client_url: &str) -> String {
    format!("{}/guidelines", client_url.trim_end_matches('/'))
}

pub fn violation_text(client_url: &str) -> String {
    format!(
        "Your recent post was flagged for violating our community guidelines.\n\n\
        Our automated systems detected content that violates our policies regarding \
        cyberbullying or inappropriate content. Please review our guidelines before \
        posting again:\n{}\n\n\
        Repeated violations may result in account restrictions.\n\n\
        This is an automated message - please do not reply directly.",
        guidelines_link(client_url)
    )
}

pub fn violation_html(client_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="margin: 0; padding: 20px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: #2d3436;">
    <div style="max-width: 600px; margin: 0 auto;">
        <h2>Community Guidelines Alert</h2>
        <p>Your recent post didn't meet our community standards.</p>
        <p style="background: #fff9f9; padding: 16px; border: 1px solid #ffe3e3; border-radius: 8px; color: #e74c3c;">
            Our automated systems detected content that violates our policies regarding cyberbullying or inappropriate content.
        </p>
        <p>Please review our community guidelines before posting again. Repeated violations may result in account restrictions.</p>
        <p style="margin: 30px 0;">
            <a href="{link}" style="background-color: #3498db; color: #fff; padding: 12px 24px; text-decoration: none; border-radius: 8px; display: inline-block;">Review Guidelines</a>
        </p>
        <p style="color: #7f8c8d; font-size: 12px;">This is an automated message - please do not reply directly.</p>
    </div>
</body>
</html>"#,
        link = guidelines_link(client_url)
    )
}
