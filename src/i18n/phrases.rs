//! Reply families. Every entry in a family means the same thing; the
//! gateway picks one through its seedable chooser.

use convoy_core::intent::IntentDomain;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Greeting,
    ChitChat,
    Unclear,
    /// Acknowledgement sent before calling an action handler.
    /// Entries contain a `{topic}` placeholder.
    Ack,
}

pub fn family(family: Family, lang: &str) -> &'static [&'static str] {
    match family {
        Family::Greeting => match lang {
            "Spanish" => &[
                "¡Hola! Soy el asistente de Convoy. ¿En qué te ayudo hoy?",
                "¡Buenas! ¿Facturas, rutas o pagos? Dime qué necesitas.",
                "¡Hola! Escribe *ayuda* para ver lo que puedo hacer.",
            ],
            "Portuguese" => &[
                "Olá! Sou o assistente do Convoy. Como posso ajudar hoje?",
                "Oi! Faturas, rotas ou pagamentos? Diga o que precisa.",
                "Olá! Escreva *help* para ver o que posso fazer.",
            ],
            "French" => &[
                "Bonjour ! Je suis l'assistant Convoy. Comment puis-je vous aider ?",
                "Salut ! Factures, trajets ou paiements ? Dites-moi ce qu'il vous faut.",
                "Bonjour ! Écrivez *help* pour voir ce que je sais faire.",
            ],
            _ => &[
                "Hi! I'm the Convoy assistant. What can I do for you today?",
                "Hello! Invoices, routes or payments? Tell me what you need.",
                "Hey there! Type *help* to see what I can do.",
            ],
        },
        Family::ChitChat => match lang {
            "Spanish" => &[
                "¡Todo bien por aquí! Cuando quieras, dime qué necesitas de tu negocio.",
                "Soy un asistente para tu operación de transporte. ¿Qué hacemos hoy?",
            ],
            "Portuguese" => &[
                "Tudo certo por aqui! Quando quiser, diga o que precisa do seu negócio.",
                "Sou um assistente para a sua operação de transporte. O que fazemos hoje?",
            ],
            "French" => &[
                "Tout va bien ici ! Dites-moi quand vous voulez ce qu'il vous faut.",
                "Je suis un assistant pour votre activité de transport. On fait quoi aujourd'hui ?",
            ],
            _ => &[
                "All good on my side! Whenever you're ready, tell me what your business needs.",
                "I'm an assistant for your transport operation. What shall we do today?",
            ],
        },
        Family::Unclear => match lang {
            "Spanish" => &[
                "No entendí bien. ¿Puedes decirlo de otra forma? Escribe *menu* para ver opciones.",
                "Hmm, no estoy seguro de qué necesitas. Prueba con *ayuda*.",
            ],
            "Portuguese" => &[
                "Não entendi bem. Pode dizer de outro jeito? Escreva *menu* para ver opções.",
                "Hmm, não tenho certeza do que você precisa. Tente *help*.",
            ],
            "French" => &[
                "Je n'ai pas bien compris. Pouvez-vous reformuler ? Écrivez *menu* pour voir les options.",
                "Hmm, je ne suis pas sûr de ce qu'il vous faut. Essayez *help*.",
            ],
            _ => &[
                "I didn't quite get that. Could you say it another way? Type *menu* to see options.",
                "Hmm, I'm not sure what you need. Try *help*.",
            ],
        },
        Family::Ack => match lang {
            "Spanish" => &[
                "Un momento, reviso {topic}...",
                "Enseguida, trabajando en {topic}...",
                "Dame un segundo con {topic}...",
            ],
            "Portuguese" => &[
                "Um momento, verificando {topic}...",
                "Já vou, trabalhando em {topic}...",
                "Só um segundo com {topic}...",
            ],
            "French" => &[
                "Un instant, je regarde {topic}...",
                "Tout de suite, je m'occupe de {topic}...",
                "Une seconde pour {topic}...",
            ],
            _ => &[
                "One moment, checking {topic}...",
                "On it, working on {topic}...",
                "Give me a second with {topic}...",
            ],
        },
    }
}

/// Noun phrase for a domain, used inside acknowledgements.
pub fn topic(domain: IntentDomain, lang: &str) -> &'static str {
    match (domain, lang) {
        (IntentDomain::Invoice, "Spanish") => "tu factura",
        (IntentDomain::Invoice, "Portuguese") => "sua fatura",
        (IntentDomain::Invoice, "French") => "votre facture",
        (IntentDomain::Invoice, _) => "your invoice",
        (IntentDomain::Client, "Spanish") => "tus clientes",
        (IntentDomain::Client, "Portuguese") => "seus clientes",
        (IntentDomain::Client, "French") => "vos clients",
        (IntentDomain::Client, _) => "your clients",
        (IntentDomain::Wallet, "Spanish") => "tu billetera",
        (IntentDomain::Wallet, "Portuguese") => "sua carteira",
        (IntentDomain::Wallet, "French") => "votre portefeuille",
        (IntentDomain::Wallet, _) => "your wallet",
        (IntentDomain::Route, "Spanish") => "tus rutas",
        (IntentDomain::Route, "Portuguese") => "suas rotas",
        (IntentDomain::Route, "French") => "vos trajets",
        (IntentDomain::Route, _) => "your routes",
        (IntentDomain::Driver, "Spanish") => "tus conductores",
        (IntentDomain::Driver, "Portuguese") => "seus motoristas",
        (IntentDomain::Driver, "French") => "vos chauffeurs",
        (IntentDomain::Driver, _) => "your drivers",
        (IntentDomain::Vehicle, "Spanish") => "tus vehículos",
        (IntentDomain::Vehicle, "Portuguese") => "seus veículos",
        (IntentDomain::Vehicle, "French") => "vos véhicules",
        (IntentDomain::Vehicle, _) => "your vehicles",
        (IntentDomain::Payroll, "Spanish") => "la nómina",
        (IntentDomain::Payroll, "Portuguese") => "a folha de pagamento",
        (IntentDomain::Payroll, "French") => "la paie",
        (IntentDomain::Payroll, _) => "payroll",
        (IntentDomain::Report, "Spanish") => "tu reporte",
        (IntentDomain::Report, "Portuguese") => "seu relatório",
        (IntentDomain::Report, "French") => "votre rapport",
        (IntentDomain::Report, _) => "your report",
        (IntentDomain::Utility, "Spanish") => "tu cuenta",
        (IntentDomain::Utility, "Portuguese") => "sua conta",
        (IntentDomain::Utility, "French") => "votre compte",
        (IntentDomain::Utility, _) => "your account",
    }
}
