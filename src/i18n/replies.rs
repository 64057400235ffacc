//! Full-sentence replies.

pub(super) fn lookup(key: &str, lang: &str) -> Option<&'static str> {
    let s = match key {
        "help" => match lang {
            "Spanish" => "*Convoy* — tu oficina de transporte por chat.\n\n\
                 Puedes escribir cosas como:\n\
                 - _crear factura para Acme por 5000_\n\
                 - _lista de rutas_\n\
                 - _saldo de la billetera_\n\
                 - _agregar conductor Juan Pérez_\n\n\
                 Después de una vista previa responde *sí*, *editar*, *enviar* o *cancelar*.\n\
                 Escribe *menu* para ver las opciones.",
            "Portuguese" => "*Convoy* — seu escritório de transporte no chat.\n\n\
                 Você pode escrever coisas como:\n\
                 - _criar fatura para Acme de 5000_\n\
                 - _listar rotas_\n\
                 - _saldo da carteira_\n\
                 - _adicionar motorista João Silva_\n\n\
                 Depois de uma pré-visualização responda *sim*, *editar*, *enviar* ou *cancelar*.\n\
                 Escreva *menu* para ver as opções.",
            "French" => "*Convoy* — votre bureau de transport par chat.\n\n\
                 Vous pouvez écrire par exemple :\n\
                 - _créer une facture pour Acme de 5000_\n\
                 - _lister les trajets_\n\
                 - _solde du portefeuille_\n\
                 - _ajouter le chauffeur Jean Dupont_\n\n\
                 Après un aperçu répondez *oui*, *modifier*, *envoyer* ou *annuler*.\n\
                 Écrivez *menu* pour voir les options.",
            _ => "*Convoy* — your transport back office over chat.\n\n\
                 You can write things like:\n\
                 - _create invoice for Acme for 5000_\n\
                 - _list routes_\n\
                 - _wallet balance_\n\
                 - _add driver John Smith_\n\n\
                 After a preview reply *yes*, *edit*, *send* or *cancel*.\n\
                 Type *menu* to see the options.",
        },
        "compliment_reply" => match lang {
            "Spanish" => "¡Gracias! Aquí estoy para lo que necesites.",
            "Portuguese" => "Obrigado! Estou aqui para o que precisar.",
            "French" => "Merci ! Je suis là pour tout ce dont vous avez besoin.",
            _ => "Thank you! I'm here whenever you need me.",
        },
        "confirmed" => match lang {
            "Spanish" => "Confirmado. Di *enviar* cuando quieras mandarla.",
            "Portuguese" => "Confirmado. Diga *enviar* quando quiser mandá-la.",
            "French" => "Confirmé. Dites *envoyer* quand vous voulez l'expédier.",
            _ => "Confirmed. Say *send it* whenever you want it delivered.",
        },
        "cancelled" => match lang {
            "Spanish" => "Listo, descarté el borrador.",
            "Portuguese" => "Pronto, descartei o rascunho.",
            "French" => "C'est fait, le brouillon est abandonné.",
            _ => "Done, the draft was discarded.",
        },
        "declined" => match lang {
            "Spanish" => "Entendido, no hice nada.",
            "Portuguese" => "Entendido, não fiz nada.",
            "French" => "Compris, je n'ai rien fait.",
            _ => "Understood, nothing was changed.",
        },
        "confirm_prompt" => match lang {
            "Spanish" => "¿Todo correcto? Responde *cancelar* para descartarla.",
            "Portuguese" => "Está tudo certo? Responda *cancelar* para descartar.",
            "French" => "Tout est correct ? Répondez *annuler* pour l'abandonner.",
            _ => "Does everything look right? Reply *cancel* to discard it.",
        },
        "voice_unclear" => match lang {
            "Spanish" => "No pude entender la nota de voz, parece vacía o muy baja. ¿Puedes repetirla más cerca del micrófono o escribirlo?",
            "Portuguese" => "Não consegui entender o áudio, parece vazio ou muito baixo. Pode repetir mais perto do microfone ou escrever?",
            "French" => "Je n'ai pas compris la note vocale, elle semble vide ou trop faible. Pouvez-vous la refaire plus près du micro ou l'écrire ?",
            _ => "I couldn't make out that voice note, it sounds empty or too quiet. Could you record it again closer to the mic, or type it?",
        },
        "voice_corrupted" => match lang {
            "Spanish" => "El audio llegó dañado o demasiado corto. Por favor envíalo de nuevo.",
            "Portuguese" => "O áudio chegou corrompido ou curto demais. Por favor envie de novo.",
            "French" => "L'audio est arrivé endommagé ou trop court. Merci de le renvoyer.",
            _ => "That audio arrived damaged or too short to play. Please send it again.",
        },
        "voice_timeout" => match lang {
            "Spanish" => "No pude descargar la nota de voz por un problema de red. Inténtalo de nuevo en un momento.",
            "Portuguese" => "Não consegui baixar o áudio por um problema de rede. Tente de novo em instantes.",
            "French" => "Je n'ai pas pu télécharger la note vocale à cause du réseau. Réessayez dans un instant.",
            _ => "I couldn't download that voice note because of a network problem. Please try again in a moment.",
        },
        "voice_unavailable" => match lang {
            "Spanish" => "Ahora mismo no puedo procesar notas de voz. Por favor escribe tu mensaje.",
            "Portuguese" => "No momento não consigo processar áudios. Por favor escreva sua mensagem.",
            "French" => "Je ne peux pas traiter les notes vocales pour le moment. Merci d'écrire votre message.",
            _ => "I can't process voice notes right now. Please type your message instead.",
        },
        "not_supported" => match lang {
            "Spanish" => "Eso todavía no está disponible por chat. Usa el panel web para esta operación.",
            "Portuguese" => "Isso ainda não está disponível pelo chat. Use o painel web para esta operação.",
            "French" => "Ce n'est pas encore disponible par chat. Utilisez le tableau de bord web pour cette opération.",
            _ => "That isn't available over chat yet. Please use the web dashboard for this one.",
        },
        "action_failed" => match lang {
            "Spanish" => "Algo falló de nuestro lado al procesar eso. Escribe *reintentar* en un momento.",
            "Portuguese" => "Algo falhou do nosso lado ao processar isso. Escreva *tentar de novo* em instantes.",
            "French" => "Quelque chose a échoué de notre côté. Écrivez *réessayer* dans un instant.",
            _ => "Something went wrong on our side while doing that. Say *try again* in a moment.",
        },
        "try_later" => match lang {
            "Spanish" => "Estamos teniendo problemas técnicos. Por favor vuelve a escribir en unos minutos.",
            "Portuguese" => "Estamos com problemas técnicos. Por favor escreva de novo em alguns minutos.",
            "French" => "Nous rencontrons un problème technique. Merci de réécrire dans quelques minutes.",
            _ => "We're having technical trouble. Please message again in a few minutes.",
        },
        "retry_hint" => match lang {
            "Spanish" => "Corrígelo y escribe *reintentar*.",
            "Portuguese" => "Corrija e escreva *tentar de novo*.",
            "French" => "Corrigez puis écrivez *réessayer*.",
            _ => "Fix that and say *try again*.",
        },
        "retry_exhausted" => match lang {
            "Spanish" => "Ya lo intentamos varias veces. Reformula tu pedido con todos los datos, por favor.",
            "Portuguese" => "Já tentamos várias vezes. Reformule o pedido com todos os dados, por favor.",
            "French" => "Nous avons déjà essayé plusieurs fois. Reformulez votre demande avec tous les détails, s'il vous plaît.",
            _ => "We've tried that a few times already. Please rephrase your request with all the details.",
        },
        "done" => match lang {
            "Spanish" => "Hecho.",
            "Portuguese" => "Feito.",
            "French" => "C'est fait.",
            _ => "Done.",
        },
        "language_unknown" => match lang {
            "Spanish" => "No reconozco ese idioma. Puedo responder en English, Español, Português o Français.",
            "Portuguese" => "Não reconheço esse idioma. Posso responder em English, Español, Português ou Français.",
            "French" => "Je ne reconnais pas cette langue. Je peux répondre en English, Español, Português ou Français.",
            _ => "I don't recognise that language. I can reply in English, Español, Português or Français.",
        },
        _ => return None,
    };
    Some(s)
}
