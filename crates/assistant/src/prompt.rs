//! Prompt assembly.
//!
//! The full prompt sent to the provider is laid out as:
//!
//! 1. **System** — persona, answering rules, the asset marker commands
//! 2. **Catalog** — the rendered price/stock report
//! 3. **Promo** — the current promotion text
//! 4. **Message** — the customer's message, with the remembered topic
//!    injected when the message itself names no model
//! 5. **Guidance** — formatting reminder plus a greeting clause that depends
//!    on whether the customer was already greeted
//!
//! Assembly is deterministic: identical inputs always produce identical output.

use dealerbot_catalog::Catalog;
use dealerbot_config::AssistantConfig;
use dealerbot_memory::{mentions_topic, ConversationStore};
use tracing::{debug, info};

/// Assemble the full prompt for `message` from the catalog and the
/// customer's remembered state.
pub async fn build_prompt(
    config: &AssistantConfig,
    catalog: &Catalog,
    conversations: &ConversationStore,
    user_id: &str,
    message: &str,
) -> String {
    let topic = conversations.topic(user_id).await;
    let contextual = contextualize(message, topic.as_deref());
    if contextual != message {
        debug!(user = %user_id, topic = ?topic, "Context injected into follow-up");
    }

    let report = catalog.report(false).await;
    let system = system_prompt(config, &report);
    let greeted = conversations.is_greeted(user_id).await;

    info!(user = %user_id, report_chars = report.len(), greeted, "Prompt assembled");
    assemble(&system, &contextual, greeted)
}

/// The system layer with the catalog report and promotion embedded.
pub fn system_prompt(config: &AssistantConfig, report: &str) -> String {
    let persona = &config.persona_name;
    let dealer = &config.dealer_name;

    format!(
        "Kamu adalah {persona}, Customer Service di {dealer}.
Gaya bicaramu ramah, solutif, dan profesional (Bahasa Indonesia santai dengan sentuhan lokal).

ATURAN FORMAT:
1. Gunakan *bold* (satu asterisk) untuk harga, nama motor, dan poin penting. JANGAN gunakan **double asterisk**.
2. Pisahkan setiap poin dengan baris baru dan pecah jawaban jadi paragraf pendek.

GREETING:
- Sapaan \"Sampurasun\" HANYA untuk user yang BENAR-BENAR baru pertama kali chat.
- User yang sudah pernah chat langsung dijawab, tanpa sapaan pembuka.

STOK:
- Lihat bagian \"INFO STOK UNIT\" di data motor.
- Jika motor yang ditanya tidak ada di daftar stok, sampaikan bahwa unit sedang KOSONG/INDENT dan tawarkan booking.
- Jangan pernah bilang \"Ready\" kalau tidak ada di data stok.

ANTI HALUSINASI:
1. HANYA gunakan informasi yang ada di DATA MOTOR. Jangan mengarang harga atau spesifikasi.
2. Jika info tidak ada di data, katakan dengan jujur bahwa {persona} belum memilikinya.
3. Pertanyaan di luar topik motor/dealer diarahkan kembali dengan ramah.

MARKER GAMBAR (WAJIB di awal jawaban bila relevan):
Di sebelah nama motor pada DATA MOTOR ada teks '(Kode Gambar: [FOLDER_IMG: NAMA_FOLDER])'. Gunakan NAMA_FOLDER itu:
1. [SEND_IMAGE:NAMA_FOLDER] jika user minta gambar/foto motor.
2. [SEND_PRICELIST:NAMA_FOLDER] jika user tanya harga, DP, cicilan, atau kredit.
3. [SEND_ALL_COLORS:NAMA_FOLDER] jika user tanya pilihan warna.

PRINSIP JAWABAN:
1. Jaga konteks: pertanyaan lanjutan dianggap membahas motor yang sama.
2. Jangan tanya varian jika user minta gambar; kirim varian paling umum.

DATA MOTOR:
{report}

PROMO:
{promo}

Sekarang, jawab user. INGAT MARKER GAMBAR JIKA DIPERLUKAN!",
        promo = config.promo,
    )
}

/// Prefix the remembered topic onto a follow-up that names no model.
///
/// `topic` must already be filtered for freshness by the conversation store.
pub fn contextualize(message: &str, topic: Option<&str>) -> String {
    match topic {
        Some(topic) if !mentions_topic(message) => format!(
            "[SYSTEM CONTEXT: User sedang bertanya tentang motor {}. \
             Jawablah pertanyaan berikut dalam konteks motor tersebut.]\n\nUser: {message}",
            topic.to_uppercase()
        ),
        _ => message.to_string(),
    }
}

/// Formatting reminder and greeting clause appended after the message.
pub fn guidance(greeted: bool) -> String {
    let greeting = if greeted {
        "(SYSTEM: User ini SUDAH PERNAH chat sebelumnya. JANGAN pakai greeting \"Sampurasun\" lagi. Langsung jawab pertanyaannya.)"
    } else {
        "(SYSTEM: User ini BARU PERTAMA KALI chat. Boleh pakai greeting \"Sampurasun\".)"
    };

    format!(
        "\n\n(SYSTEM REMINDER: Jika user meminta gambar, WAJIB sertakan marker [SEND_IMAGE:NAMA_MOTOR] \
         atau [SEND_ALL_COLORS:NAMA_MOTOR] di awal jawaban. Format: Gunakan *bold* (1 asterisk), \
         BUKAN **bold** (2 asterisk).)\n\n{greeting}"
    )
}

/// System layer, message and guidance joined into the prompt text.
pub fn assemble(system: &str, message: &str, greeted: bool) -> String {
    format!("{system}\n\n{message}{}", guidance(greeted))
}
