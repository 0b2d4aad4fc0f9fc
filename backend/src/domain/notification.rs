//! Plain-text RSVP emails.
//!
//! Guests receive a confirmation whose wording depends on whether they will
//! attend; the couple's operator addresses receive a summary of the whole
//! submission, companions included.

use std::fmt::Write as _;

use super::ports::EmailMessage;
use super::{CompanionSubmission, GuestProfile, GuestSubmission};

/// Every email to send for `submission`: the guest's confirmation (when an
/// address was given) followed by one summary per operator address.
pub fn rsvp_emails(submission: &GuestSubmission, operators: &[String]) -> Vec<EmailMessage> {
    let mut messages = Vec::with_capacity(operators.len() + 1);
    if let Some(email) = submission.email() {
        messages.push(guest_confirmation(submission, email));
    }
    let summary = operator_summary_body(submission);
    let subject = operator_subject(&submission.profile);
    messages.extend(operators.iter().map(|operator| EmailMessage {
        recipient: operator.clone(),
        subject: subject.clone(),
        body: summary.clone(),
    }));
    messages
}

fn guest_confirmation(submission: &GuestSubmission, recipient: &str) -> EmailMessage {
    let profile = &submission.profile;
    let name = profile.full_name.trim();
    let (subject, mut body) = if profile.attending {
        (
            format!("¡{name}, nos vemos en nuestra boda!"),
            format!(
                "Hola {name}:\n\n\
                 ¡Estamos encantados de que puedas acompañarnos en nuestro gran día! \
                 Hemos recibido tu confirmación:\n\n"
            ),
        )
    } else {
        (
            format!("{name}, gracias por tu respuesta"),
            format!(
                "Hola {name}:\n\n\
                 Sentimos que no puedas acompañarnos, pero agradecemos mucho que nos \
                 lo hayas hecho saber. Esto es lo que hemos recibido:\n\n"
            ),
        )
    };
    write_profile(&mut body, profile);
    write_companions(&mut body, &submission.companions);
    body.push_str("\nCon cariño,\nLos novios\n");
    EmailMessage {
        recipient: recipient.to_owned(),
        subject,
        body,
    }
}

fn operator_subject(profile: &GuestProfile) -> String {
    let kind = if profile.attending {
        "asistente"
    } else {
        "invitado"
    };
    format!("Nuevo {kind}: {}", profile.full_name.trim())
}

fn operator_summary_body(submission: &GuestSubmission) -> String {
    let profile = &submission.profile;
    let mut body = format!("Nueva respuesta de {}\n\n", profile.full_name.trim());
    if let Some(email) = submission.email() {
        let _ = writeln!(body, "Email: {email}");
    }
    write_profile(&mut body, profile);
    write_companions(&mut body, &submission.companions);
    body
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Sí" } else { "No" }
}

fn write_optional(body: &mut String, label: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        let _ = writeln!(body, "{label}: {value}");
    }
}

fn write_profile(body: &mut String, profile: &GuestProfile) {
    let _ = writeln!(body, "Asistencia: {}", yes_no(profile.attending));
    let _ = writeln!(body, "Acompañantes: {}", profile.companion_count);
    write_optional(body, "Restricciones alimentarias", &profile.restrictions);
    let _ = writeln!(body, "Autobús: {}", yes_no(profile.bus_attendance));
    write_optional(body, "Tipo de autobús", &profile.bus_type);
    write_optional(body, "Color", &profile.color);
    write_song(body, &profile.song_preference, &profile.music_platform);
    write_optional(body, "Mensaje", &profile.message);
}

fn write_song(body: &mut String, song: &str, platform: &str) {
    let song = song.trim();
    if song.is_empty() {
        return;
    }
    let platform = platform.trim();
    if platform.is_empty() {
        let _ = writeln!(body, "Canción: {song}");
    } else {
        let _ = writeln!(body, "Canción: {song} ({platform})");
    }
}

fn write_companions(body: &mut String, companions: &[CompanionSubmission]) {
    if companions.is_empty() {
        return;
    }
    body.push_str("\nAcompañantes:\n");
    for companion in companions {
        let _ = writeln!(body, "- {}", companion.full_name.trim());
        write_optional(body, "  Restricciones alimentarias", &companion.restrictions);
        let _ = writeln!(body, "  Autobús: {}", yes_no(companion.bus_attendance));
        write_optional(body, "  Tipo de autobús", &companion.bus_type);
        write_optional(body, "  Color", &companion.color);
    }
}
