//! Static HTML for the form pages.

const PROFILE_FIELDS: &[(&str, &str, &str)] = &[
    ("website", "Website", "text"),
    ("firstName", "First name", "text"),
    ("lastName", "Last name", "text"),
    ("email", "Email address", "email"),
    ("country", "Country", "text"),
    ("streetAddress", "Street address", "text"),
    ("city", "City", "text"),
    ("region", "State / Province", "text"),
    ("zip", "ZIP / Postal code", "text"),
];

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

pub fn profile_form() -> String {
    let inputs: String = PROFILE_FIELDS
        .iter()
        .map(|(name, label, kind)| {
            format!(
                "<label for=\"{name}\">{label}</label>\n\
                 <input type=\"{kind}\" name=\"{name}\" id=\"{name}\">\n"
            )
        })
        .collect();
    let body = format!(
        "<h2>Profile</h2>\n\
         <form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n\
         {inputs}\
         <label for=\"about\">About</label>\n\
         <textarea id=\"about\" name=\"about\" rows=\"3\"></textarea>\n\
         <label for=\"image\">Photo</label>\n\
         <input type=\"file\" id=\"image\" name=\"image\" accept=\"image/jpeg,image/png,image/webp\">\n\
         <label for=\"resume\">Resume</label>\n\
         <input type=\"file\" id=\"resume\" name=\"resume\" accept=\"application/pdf\">\n\
         <button type=\"submit\">Save</button>\n\
         </form>"
    );
    layout("Profile", &body)
}

pub fn login_form(heading: &str, action: &str) -> String {
    let body = format!(
        "<h2 id=\"login-header\">{heading}</h2>\n\
         <form method=\"post\" action=\"{action}\">\n\
         <label for=\"email\">Email address</label>\n\
         <input autofocus id=\"email\" name=\"email\" type=\"text\">\n\
         <label for=\"password\">Password</label>\n\
         <input id=\"password\" name=\"password\" type=\"password\">\n\
         <button type=\"submit\">Sign in</button>\n\
         </form>"
    );
    layout("Trellix Login", &body)
}

pub fn success() -> String {
    layout(
        "Thank you",
        "<h2>Thank you for sending us your resume!</h2>\n<a href=\"/\">Back</a>",
    )
}
