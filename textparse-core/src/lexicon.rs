//! # Dados Linguísticos Embutidos
//!
//! Listas compiladas no binário que alimentam os modelos embutidos
//! (`en_core_rules` e `pt_core_rules`) e os parâmetros Punkt para inglês:
//!
//! - Abreviações e clíticos (tokenizador).
//! - Léxico palavra → tag, com tags Penn Treebank (inglês) ou Universal
//!   Dependencies (português).
//! - Regras de sufixo para palavras fora do léxico.
//! - Tipos de abreviação e iniciadores de sentença (segmentador Punkt).
//!
//! Nada aqui é treinado: são recursos prontos, carregados como estão.

/// Abreviações do inglês (minúsculas, sem o ponto final).
pub const EN_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e",
    "inc", "ltd", "co", "corp", "u.s", "u.k", "a.m", "p.m", "jan", "feb", "mar",
    "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "mt", "ft",
    "approx", "dept", "est", "fig", "gen", "gov", "sen", "rep", "rev", "sgt", "capt",
];

/// Clíticos do inglês, separados da palavra hospedeira.
pub const EN_CLITICS: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Abreviações comuns em PT-BR que não devem ter o ponto tratado como fim de sentença
pub const PT_ABBREVIATIONS: &[&str] = &[
    "Dr", "Dra", "Sr", "Sra", "Prof", "Profa", "Gov", "Dep", "Sen", "Min",
    "Gen", "Cap", "Sgt", "Cel", "Brig", "Adm", "Des", "Pres", "Eng", "Arq",
    "km", "cm", "mm", "kg", "mg", "ml", "dl", "ha", "etc", "vol", "núm",
    "art", "pág", "pag", "cap", "tel", "fax", "av", "pg", "ibid", "op",
];

/// Listas do tokenizador para um idioma: `(abreviações, clíticos)`.
pub fn tokenizer_exceptions(lang: &str) -> (&'static [&'static str], &'static [&'static str]) {
    match lang {
        "en" => (EN_ABBREVIATIONS, EN_CLITICS),
        "pt" => (PT_ABBREVIATIONS, &[]),
        _ => (&[], &[]),
    }
}

/// Léxico do inglês com tags Penn Treebank (palavras em minúsculas).
pub const EN_LEXICON: &[(&str, &str)] = &[
    // Determinantes
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("that", "DT"),
    ("these", "DT"), ("those", "DT"), ("every", "DT"), ("each", "DT"), ("some", "DT"),
    ("any", "DT"), ("no", "DT"), ("all", "DT"), ("both", "DT"), ("another", "DT"),
    // Pronomes
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"),
    ("we", "PRP"), ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("us", "PRP"),
    ("them", "PRP"), ("myself", "PRP"), ("yourself", "PRP"), ("itself", "PRP"),
    ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"), ("her", "PRP$"), ("its", "PRP$"),
    ("our", "PRP$"), ("their", "PRP$"),
    ("who", "WP"), ("what", "WP"), ("whom", "WP"), ("which", "WDT"),
    ("when", "WRB"), ("where", "WRB"), ("why", "WRB"), ("how", "WRB"),
    // Preposições e subordinadas
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("by", "IN"), ("for", "IN"),
    ("with", "IN"), ("from", "IN"), ("about", "IN"), ("into", "IN"), ("over", "IN"),
    ("under", "IN"), ("after", "IN"), ("before", "IN"), ("between", "IN"),
    ("through", "IN"), ("during", "IN"), ("without", "IN"), ("against", "IN"),
    ("among", "IN"), ("because", "IN"), ("if", "IN"), ("while", "IN"), ("since", "IN"),
    ("than", "IN"), ("as", "IN"), ("upon", "IN"), ("near", "IN"), ("although", "IN"),
    ("to", "TO"),
    ("and", "CC"), ("or", "CC"), ("but", "CC"), ("nor", "CC"), ("yet", "CC"),
    // Modais e auxiliares
    ("can", "MD"), ("could", "MD"), ("will", "MD"), ("would", "MD"), ("shall", "MD"),
    ("should", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"), ("ca", "MD"),
    ("wo", "MD"), ("'ll", "MD"), ("'d", "MD"),
    ("is", "VBZ"), ("has", "VBZ"), ("does", "VBZ"), ("are", "VBP"), ("am", "VBP"),
    ("have", "VBP"), ("do", "VBP"), ("'re", "VBP"), ("'ve", "VBP"), ("'m", "VBP"),
    ("was", "VBD"), ("were", "VBD"), ("had", "VBD"), ("did", "VBD"),
    ("be", "VB"), ("been", "VBN"), ("being", "VBG"),
    ("'s", "POS"),
    // Advérbios
    ("not", "RB"), ("n't", "RB"), ("very", "RB"), ("also", "RB"), ("just", "RB"),
    ("too", "RB"), ("never", "RB"), ("always", "RB"), ("often", "RB"), ("here", "RB"),
    ("there", "RB"), ("now", "RB"), ("then", "RB"), ("only", "RB"), ("still", "RB"),
    ("already", "RB"), ("again", "RB"), ("soon", "RB"), ("so", "RB"), ("well", "RB"),
    ("please", "UH"), ("hi", "UH"), ("hello", "UH"), ("hey", "UH"), ("oh", "UH"),
    ("yes", "UH"), ("thanks", "UH"),
    // Verbos frequentes
    ("go", "VB"), ("went", "VBD"), ("gone", "VBN"), ("say", "VB"), ("said", "VBD"),
    ("know", "VB"), ("knew", "VBD"), ("think", "VB"), ("thought", "VBD"), ("get", "VB"),
    ("got", "VBD"), ("make", "VB"), ("made", "VBD"), ("see", "VB"), ("saw", "VBD"),
    ("come", "VB"), ("came", "VBD"), ("take", "VB"), ("took", "VBD"), ("want", "VB"),
    ("like", "VB"), ("give", "VB"), ("gave", "VBD"), ("find", "VB"), ("found", "VBD"),
    ("tell", "VB"), ("told", "VBD"), ("sat", "VBD"), ("ran", "VBD"), ("left", "VBD"), ("met", "VBD"),
    ("agree", "VB"), ("help", "VB"), ("need", "VB"), ("read", "VB"), ("wrote", "VBD"),
    // Substantivos e adjetivos frequentes
    ("time", "NN"), ("people", "NNS"), ("year", "NN"), ("day", "NN"), ("way", "NN"),
    ("thing", "NN"), ("man", "NN"), ("men", "NNS"), ("woman", "NN"), ("women", "NNS"),
    ("world", "NN"), ("life", "NN"), ("cat", "NN"), ("dog", "NN"), ("mat", "NN"),
    ("article", "NN"), ("page", "NN"), ("edit", "NN"), ("source", "NN"), ("work", "NN"),
    ("good", "JJ"), ("new", "JJ"), ("old", "JJ"), ("great", "JJ"), ("big", "JJ"),
    ("small", "JJ"), ("late", "JJ"), ("early", "JJ"), ("happy", "JJ"), ("bad", "JJ"),
    ("little", "JJ"), ("quick", "JJ"), ("brown", "JJ"), ("lazy", "JJ"), ("sure", "JJ"),
];

/// Regras de sufixo do inglês, testadas em ordem.
pub const EN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("ing", "VBG"), ("ed", "VBD"), ("ly", "RB"), ("tion", "NN"), ("sion", "NN"),
    ("ment", "NN"), ("ness", "NN"), ("ity", "NN"), ("ship", "NN"), ("ous", "JJ"),
    ("ful", "JJ"), ("able", "JJ"), ("ible", "JJ"), ("ive", "JJ"), ("less", "JJ"),
    ("al", "JJ"), ("est", "JJS"), ("ss", "NN"), ("us", "NN"), ("s", "NNS"),
];

/// Léxico do português com tags Universal Dependencies.
pub const PT_LEXICON: &[(&str, &str)] = &[
    ("o", "DET"), ("a", "DET"), ("os", "DET"), ("as", "DET"), ("um", "DET"),
    ("uma", "DET"), ("uns", "DET"), ("umas", "DET"), ("este", "DET"), ("esta", "DET"),
    ("esse", "DET"), ("essa", "DET"), ("seu", "DET"), ("sua", "DET"),
    ("de", "ADP"), ("em", "ADP"), ("para", "ADP"), ("por", "ADP"), ("com", "ADP"),
    ("sem", "ADP"), ("sobre", "ADP"), ("entre", "ADP"), ("até", "ADP"),
    ("do", "ADP"), ("da", "ADP"), ("dos", "ADP"), ("das", "ADP"), ("no", "ADP"),
    ("na", "ADP"), ("nos", "ADP"), ("nas", "ADP"), ("pelo", "ADP"), ("pela", "ADP"),
    ("ao", "ADP"), ("à", "ADP"),
    ("e", "CCONJ"), ("ou", "CCONJ"), ("mas", "CCONJ"),
    ("que", "SCONJ"), ("porque", "SCONJ"), ("quando", "SCONJ"), ("se", "PRON"),
    ("eu", "PRON"), ("tu", "PRON"), ("ele", "PRON"), ("ela", "PRON"), ("nós", "PRON"),
    ("eles", "PRON"), ("elas", "PRON"), ("você", "PRON"), ("vocês", "PRON"),
    ("me", "PRON"), ("te", "PRON"), ("lhe", "PRON"),
    ("é", "AUX"), ("foi", "AUX"), ("são", "AUX"), ("era", "AUX"), ("está", "AUX"),
    ("estava", "AUX"), ("ser", "AUX"), ("estar", "AUX"), ("tem", "AUX"), ("vai", "AUX"),
    ("não", "ADV"), ("muito", "ADV"), ("também", "ADV"), ("já", "ADV"), ("ontem", "ADV"),
    ("hoje", "ADV"), ("sempre", "ADV"), ("aqui", "ADV"), ("bem", "ADV"),
    ("olá", "INTJ"), ("oi", "INTJ"),
];

/// Regras de sufixo do português, testadas em ordem.
pub const PT_SUFFIX_RULES: &[(&str, &str)] = &[
    ("mente", "ADV"), ("ção", "NOUN"), ("ções", "NOUN"), ("dade", "NOUN"),
    ("ismo", "NOUN"), ("ista", "NOUN"), ("ando", "VERB"), ("endo", "VERB"),
    ("indo", "VERB"), ("ou", "VERB"), ("ava", "VERB"), ("iu", "VERB"), ("eu", "VERB"),
    ("ar", "VERB"), ("er", "VERB"), ("ir", "VERB"), ("oso", "ADJ"), ("osa", "ADJ"),
    ("vel", "ADJ"),
];

/// Lemas irregulares do inglês, indexados pela forma em minúsculas.
pub const EN_IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("is", "be"), ("are", "be"), ("am", "be"), ("was", "be"), ("were", "be"),
    ("been", "be"), ("being", "be"), ("'m", "be"), ("'re", "be"), ("n't", "not"),
    ("'ve", "have"), ("has", "have"), ("had", "have"), ("'ll", "will"), ("ca", "can"),
    ("wo", "will"), ("did", "do"), ("does", "do"), ("went", "go"), ("gone", "go"),
    ("said", "say"), ("knew", "know"), ("thought", "think"), ("got", "get"),
    ("made", "make"), ("saw", "see"), ("came", "come"), ("took", "take"),
    ("gave", "give"), ("found", "find"), ("told", "tell"), ("sat", "sit"),
    ("ran", "run"), ("left", "leave"), ("wrote", "write"), ("met", "meet"), ("men", "man"),
    ("women", "woman"), ("people", "person"),
];

/// Tipos de abreviação do modelo Punkt para inglês.
pub const PUNKT_EN_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e",
    "inc", "ltd", "co", "corp", "u.s", "u.k", "u.n", "a.m", "p.m", "jan", "feb",
    "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "no",
    "vol", "fig", "approx", "dept", "gen", "gov", "sen", "rep", "rev", "mt", "ft",
    "cf", "al", "ed", "pp", "sgt", "capt", "col", "lt",
];

/// Palavras que frequentemente iniciam sentenças, mesmo após uma abreviação.
pub const PUNKT_EN_SENTENCE_STARTERS: &[&str] = &[
    "the", "he", "she", "it", "they", "we", "i", "but", "and", "in", "this",
    "however", "there", "a", "as", "if", "when", "what", "you", "his", "her",
];

/// Pares (palavra com ponto, palavra seguinte) que nunca delimitam sentença.
pub const PUNKT_EN_COLLOCATIONS: &[(&str, &str)] = &[
    ("no", "1"), ("vol", "1"), ("fig", "1"), ("u.s", "army"), ("st", "louis"),
];
